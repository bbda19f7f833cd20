#![allow(dead_code)]

use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use fake::Fake;
use fake::faker::company::en::CompanyName;
use mockall::mock;
use shabaka::datasource::AccountFlowsRequest;
use shabaka::datasource::DataService;
use shabaka::datasource::TransactionFlowsRequest;
use shabaka::error::DataServiceError;
use shabaka::handler::GraphObserver;
use shabaka::model::AccountMetadata;
use shabaka::model::CursorState;
use shabaka::model::Edge;
use shabaka::model::ElementsAdded;
use shabaka::model::FlowBatch;
use shabaka::model::FlowDirection;
use shabaka::model::Node;
use shabaka::model::NodeKey;
use shabaka::model::PlacementHint;
use shabaka::model::SortOrder;
use shabaka::storage::in_memory::GraphStore;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use tokio::sync::Notify;

/// Test fixtures for creating consistent test data
pub struct TestFixtures;

impl TestFixtures {
  /// Base58 account address; distinct `n` give distinct addresses.
  pub fn pubkey(n: u8) -> String {
    let mut bytes = [0x5a; 32];
    bytes[31] = n;
    Pubkey::from(bytes).to_string()
  }

  /// Base58 transaction signature (87 or 88 characters).
  pub fn signature(n: u8) -> String {
    let mut bytes = [0x5a; 64];
    bytes[63] = n;
    Signature::from(bytes).to_string()
  }

  pub fn key(n: u8) -> NodeKey {
    NodeKey::new(Self::pubkey(n)).expect("fixture node key")
  }

  pub fn node(n: u8) -> Node {
    Node::new(Self::key(n))
  }

  pub fn labelled_node(n: u8) -> Node {
    Self::node(n).with_label(Some(CompanyName().fake::<String>()))
  }

  pub fn edge(
    transaction_id: &str,
    source: u8,
    target: u8,
    asset_id: &str,
    amount: f64,
  ) -> Edge {
    Edge::new(transaction_id, Self::key(source), Self::key(target), asset_id, amount).expect("fixture edge")
  }

  pub fn batch(
    nodes: &[u8],
    edges: Vec<Edge>,
    has_more: bool,
  ) -> FlowBatch {
    FlowBatch {
      nodes: nodes.iter().map(|n| Self::node(*n)).collect(),
      edges,
      has_more,
    }
  }

  pub fn metadata(label: &str) -> AccountMetadata {
    AccountMetadata {
      label: Some(label.to_string()),
      tags: vec!["wallet".to_string()],
      ..AccountMetadata::default()
    }
  }
}

/// Custom assertions for domain-specific testing
pub struct TestAssertions;

impl TestAssertions {
  pub fn assert_store_consistent(store: &GraphStore) {
    let node_keys = store.node_keys();
    let unique_nodes: HashSet<_> = node_keys.iter().collect();
    assert_eq!(unique_nodes.len(), node_keys.len(), "duplicate node keys in store");

    let edge_keys = store.edge_keys();
    let unique_edges: HashSet<_> = edge_keys.iter().collect();
    assert_eq!(unique_edges.len(), edge_keys.len(), "duplicate edge keys in store");

    for edge_key in &edge_keys {
      assert!(store.has_node(&edge_key.source), "edge {} has dangling source", edge_key);
      assert!(store.has_node(&edge_key.target), "edge {} has dangling target", edge_key);
    }
  }
}

/// Lets a test hold a scripted response until it decides to release it.
#[derive(Clone, Default)]
pub struct Gate {
  pub entered: Arc<Notify>,
  pub release: Arc<Notify>,
}

impl Gate {
  pub async fn wait_entered(&self) {
    self.entered.notified().await;
  }

  pub fn open(&self) {
    self.release.notify_one();
  }
}

pub struct Step<T> {
  result: Result<T, u16>,
  gate:   Option<Gate>,
}

impl<T> Step<T> {
  pub fn ok(value: T) -> Self {
    Self { result: Ok(value), gate: None }
  }

  pub fn fail(status: u16) -> Self {
    Self {
      result: Err(status),
      gate:   None,
    }
  }

  pub fn gated(self) -> (Self, Gate) {
    let gate = Gate::default();
    (
      Self {
        result: self.result,
        gate:   Some(gate.clone()),
      },
      gate,
    )
  }
}

async fn play<T>(step: Option<Step<T>>) -> Result<T, DataServiceError> {
  let Some(step) = step else {
    return Err(DataServiceError::Server {
      status: 500,
      detail: "no scripted response".to_string(),
    });
  };
  if let Some(gate) = step.gate {
    gate.entered.notify_one();
    gate.release.notified().await;
  }
  step.result.map_err(|status| DataServiceError::Server {
    status,
    detail: "scripted failure".to_string(),
  })
}

/// DataService fake answering from per-operation queues and recording every
/// request it receives.
#[derive(Default)]
pub struct ScriptedDataService {
  transaction_flows:        Mutex<VecDeque<Step<FlowBatch>>>,
  account_flows:            Mutex<VecDeque<Step<FlowBatch>>>,
  metadata:                 Mutex<VecDeque<Step<AccountMetadata>>>,
  pub transaction_requests: Mutex<Vec<TransactionFlowsRequest>>,
  pub account_requests:     Mutex<Vec<AccountFlowsRequest>>,
  pub metadata_requests:    Mutex<Vec<NodeKey>>,
}

impl ScriptedDataService {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_transaction_flows(
    &self,
    step: Step<FlowBatch>,
  ) {
    self.transaction_flows.lock().unwrap().push_back(step);
  }

  pub fn push_account_flows(
    &self,
    step: Step<FlowBatch>,
  ) {
    self.account_flows.lock().unwrap().push_back(step);
  }

  pub fn push_metadata(
    &self,
    step: Step<AccountMetadata>,
  ) {
    self.metadata.lock().unwrap().push_back(step);
  }

  pub fn account_requests(&self) -> Vec<AccountFlowsRequest> {
    self.account_requests.lock().unwrap().clone()
  }

  pub fn transaction_requests(&self) -> Vec<TransactionFlowsRequest> {
    self.transaction_requests.lock().unwrap().clone()
  }
}

#[async_trait]
impl DataService for ScriptedDataService {
  async fn fetch_transaction_flows(
    &self,
    request: &TransactionFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError> {
    self.transaction_requests.lock().unwrap().push(request.clone());
    let step = self.transaction_flows.lock().unwrap().pop_front();
    play(step).await
  }

  async fn fetch_account_flows(
    &self,
    request: &AccountFlowsRequest,
  ) -> Result<FlowBatch, DataServiceError> {
    self.account_requests.lock().unwrap().push(request.clone());
    let step = self.account_flows.lock().unwrap().pop_front();
    play(step).await
  }

  async fn fetch_account_metadata(
    &self,
    account: &NodeKey,
  ) -> Result<AccountMetadata, DataServiceError> {
    self.metadata_requests.lock().unwrap().push(account.clone());
    let step = self.metadata.lock().unwrap().pop_front();
    play(step).await
  }
}

mock! {
  pub DataService {}

  #[async_trait]
  impl DataService for DataService {
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
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
  Reset(u64),
  Added {
    generation: u64,
    nodes:      usize,
    edges:      usize,
    placement:  PlacementHint,
  },
  Cursor {
    node:      NodeKey,
    direction: FlowDirection,
    sort:      SortOrder,
    state:     CursorState,
  },
}

#[derive(Default)]
pub struct RecordingObserver {
  events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
  pub fn events(&self) -> Vec<ObservedEvent> {
    self.events.lock().unwrap().clone()
  }
}

impl GraphObserver for RecordingObserver {
  fn on_session_reset(
    &self,
    generation: u64,
  ) {
    self.events.lock().unwrap().push(ObservedEvent::Reset(generation));
  }

  fn on_elements_added(
    &self,
    added: &ElementsAdded,
  ) {
    self.events.lock().unwrap().push(ObservedEvent::Added {
      generation: added.generation,
      nodes:      added.nodes.len(),
      edges:      added.edges.len(),
      placement:  added.placement.clone(),
    });
  }

  fn on_cursor_state_changed(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
    state: CursorState,
  ) {
    self.events.lock().unwrap().push(ObservedEvent::Cursor {
      node: node.clone(),
      direction,
      sort,
      state,
    });
  }
}
