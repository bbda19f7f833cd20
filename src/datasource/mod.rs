pub mod http;
pub mod model;

use async_trait::async_trait;

pub use http::HttpDataService;

use crate::error::DataServiceError;
use crate::model::AccountMetadata;
use crate::model::FlowBatch;
use crate::model::FlowDirection;
use crate::model::NodeKey;
use crate::model::SortOrder;

/// Every flow of one transaction.
///
/// The existing key sets are a hint for the service to skip what the session
/// already holds; the result is merged locally regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFlowsRequest {
  pub transaction_id: String,
  pub existing_nodes: Vec<String>,
  pub existing_edges: Vec<String>,
}

/// One page of an account's flows in one direction and sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFlowsRequest {
  pub account:        NodeKey,
  pub direction:      FlowDirection,
  pub sort:           SortOrder,
  pub limit:          u32,
  pub page:           u32,
  pub existing_nodes: Vec<String>,
  pub existing_edges: Vec<String>,
}

/// Remote service computing graph pages. Timeouts and retries belong to the
/// implementation.
#[async_trait]
pub trait DataService: Send + Sync {
  async fn fetch_transaction_flows(
    &self,
    request: &TransactionFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError>;

  async fn fetch_account_flows(
    &self,
    request: &AccountFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError>;

  async fn fetch_account_metadata(
    &self,
    account: &NodeKey,
  ) -> Result<AccountMetadata, DataServiceError>;
}
