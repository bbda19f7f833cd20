use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::error;
use tracing::warn;
use url::Url;

use super::AccountFlowsRequest;
use super::DataService;
use super::TransactionFlowsRequest;
use super::model::ExistingElements;
use super::model::WireAccount;
use super::model::WireError;
use super::model::WireFlowPage;
use crate::config::DataServiceConfig;
use crate::error::DataServiceError;
use crate::model::AccountMetadata;
use crate::model::FlowBatch;
use crate::model::NodeKey;
use crate::utils::calculate_backoff_with_jitter;

/// JSON-over-HTTP client of the flow indexing service.
#[derive(Debug, Clone)]
pub struct HttpDataService {
  http_client:         Client,
  base_url:            Url,
  max_retries:         usize,
  base_retry_delay_ms: u64,
  max_retry_delay_ms:  u64,
}

impl HttpDataService {
  pub fn new(config: &DataServiceConfig) -> Result<Self, DataServiceError> {
    let base_url = Url::parse(&config.base_url)?;
    if base_url.cannot_be_a_base() {
      return Err(DataServiceError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    let http_client = Client::builder().timeout(Duration::from_millis(config.timeout_ms)).build()?;

    Ok(Self {
      http_client,
      base_url,
      max_retries: config.max_retries,
      base_retry_delay_ms: config.base_retry_delay_ms,
      max_retry_delay_ms: config.max_retry_delay_ms,
    })
  }

  fn endpoint(
    &self,
    segments: &[&str],
  ) -> Url {
    let mut url = self.base_url.clone();
    // cannot_be_a_base was rejected in new()
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn send_once<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
  ) -> Result<T, DataServiceError> {
    let response = request.header(ACCEPT, "application/json").send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      return Err(DataServiceError::Server {
        status: status.as_u16(),
        detail: WireError::describe(&body),
      });
    }
    serde_json::from_str(&body).map_err(|e| DataServiceError::InvalidPayload(e.to_string()))
  }

  /// Sends the request built by `build`, retrying transient failures with
  /// exponential backoff.
  async fn send_with_retry<T, F>(
    &self,
    operation: &'static str,
    build: F,
  ) -> Result<T, DataServiceError>
  where
    T: DeserializeOwned,
    F: Fn() -> RequestBuilder,
  {
    let mut retry_count = 0;
    loop {
      match self.send_once(build()).await {
        Ok(value) => return Ok(value),
        Err(e) if e.is_retryable() && retry_count < self.max_retries => {
          retry_count += 1;
          let backoff_delay =
            calculate_backoff_with_jitter(retry_count - 1, self.base_retry_delay_ms, self.max_retry_delay_ms);
          warn!(
            "data_service_retry::{}::attempt::{}::delay_ms::{}::error::{}",
            operation,
            retry_count,
            backoff_delay.as_millis(),
            e
          );
          tokio::time::sleep(backoff_delay).await;
        },
        Err(e) => {
          error!("data_service_failed::{}::attempts::{}::error::{}", operation, retry_count + 1, e);
          return Err(e);
        },
      }
    }
  }
}

#[async_trait]
impl DataService for HttpDataService {
  async fn fetch_transaction_flows(
    &self,
    request: &TransactionFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError> {
    let url = self.endpoint(&["transaction_flows", &request.transaction_id]);
    let body = ExistingElements {
      existing_nodes: &request.existing_nodes,
      existing_edges: &request.existing_edges,
    };
    debug!("fetch_transaction_flows::{}::existing_nodes::{}", request.transaction_id, request.existing_nodes.len());

    let page: WireFlowPage =
      self.send_with_retry("transaction_flows", || self.http_client.post(url.clone()).json(&body)).await?;
    page.into_batch(Some(&request.transaction_id))
  }

  async fn fetch_account_flows(
    &self,
    request: &AccountFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError> {
    let mut url = self.endpoint(&["account_flows", request.account.as_str()]);
    url
      .query_pairs_mut()
      .append_pair("direction", request.direction.as_str())
      .append_pair("sort", request.sort.as_str())
      .append_pair("limit", &request.limit.to_string())
      .append_pair("page", &request.page.to_string());
    let body = ExistingElements {
      existing_nodes: &request.existing_nodes,
      existing_edges: &request.existing_edges,
    };
    debug!(
      "fetch_account_flows::{}::direction::{}::sort::{}::page::{}",
      request.account, request.direction, request.sort, request.page
    );

    let page: WireFlowPage =
      self.send_with_retry("account_flows", || self.http_client.post(url.clone()).json(&body)).await?;
    page.into_batch(None)
  }

  async fn fetch_account_metadata(
    &self,
    account: &NodeKey,
  ) -> Result<AccountMetadata, DataServiceError> {
    let url = self.endpoint(&["account", account.as_str()]);
    debug!("fetch_account_metadata::{}", account);

    let wire: WireAccount = self.send_with_retry("account", || self.http_client.get(url.clone())).await?;
    Ok(wire.into())
  }
}
