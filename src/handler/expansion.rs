use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::instrument;

use super::observer::GraphObserver;
use super::session::SessionRoot;
use crate::datasource::AccountFlowsRequest;
use crate::datasource::DataService;
use crate::datasource::TransactionFlowsRequest;
use crate::error::DataServiceError;
use crate::error::ExplorerError;
use crate::model::CursorState;
use crate::model::CursorTransition;
use crate::model::Edge;
use crate::model::EdgeKey;
use crate::model::ElementsAdded;
use crate::model::ExpansionOutcome;
use crate::model::FlowBatch;
use crate::model::FlowDirection;
use crate::model::GraphSnapshot;
use crate::model::Node;
use crate::model::NodeKey;
use crate::model::PlacementHint;
use crate::model::PreconditionViolation;
use crate::model::SeedInput;
use crate::model::SortOrder;

enum InFlightTarget {
  Cursor {
    node:      NodeKey,
    direction: FlowDirection,
    sort:      SortOrder,
  },
  Edge(EdgeKey),
}

/// Releases an in-flight lock if the expansion future is dropped while it
/// awaits the service. Disarmed once the response is in hand.
struct InFlightGuard {
  session:    Arc<RwLock<SessionRoot>>,
  generation: u64,
  target:     Option<InFlightTarget>,
}

impl InFlightGuard {
  fn new(
    session: Arc<RwLock<SessionRoot>>,
    generation: u64,
    target: InFlightTarget,
  ) -> Self {
    Self {
      session,
      generation,
      target: Some(target),
    }
  }

  fn disarm(mut self) {
    self.target = None;
  }
}

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    let Some(target) = self.target.take() else {
      return;
    };
    let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
    if session.generation() != self.generation {
      return;
    }
    match target {
      InFlightTarget::Cursor { node, direction, sort } => {
        debug!("expansion_dropped::release_cursor::{}::{}::{}", node, direction, sort);
        session.tracker.release(&node, direction, sort);
      },
      InFlightTarget::Edge(edge) => {
        debug!("expansion_dropped::release_edge::{}", edge);
        session.edges_in_flight.remove(&edge);
      },
    }
  }
}

/// Drives seed searches and expansions against one session.
///
/// Cheap to clone; every clone shares the session. The session lock is only
/// held between awaits, and observers are called after it is released.
/// Commits, resets and their callbacks are serialized by `observer_order`, so
/// the observer never hears about a generation after it heard of its reset.
#[derive(Clone)]
pub struct ExpansionController {
  session:        Arc<RwLock<SessionRoot>>,
  observer_order: Arc<Mutex<()>>,
  data_service:   Arc<dyn DataService>,
  observer:       Arc<dyn GraphObserver>,
  page_size:      u32,
}

impl ExpansionController {
  pub fn new(
    data_service: Arc<dyn DataService>,
    observer: Arc<dyn GraphObserver>,
    page_size: u32,
  ) -> Self {
    Self {
      session: Arc::new(RwLock::new(SessionRoot::new())),
      observer_order: Arc::new(Mutex::new(())),
      data_service,
      observer,
      page_size: page_size.max(1),
    }
  }

  fn read(&self) -> RwLockReadGuard<'_, SessionRoot> {
    self.session.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, SessionRoot> {
    self.session.write().unwrap_or_else(PoisonError::into_inner)
  }

  // Taken before the session lock, held until the callbacks have run.
  fn order_observers(&self) -> MutexGuard<'_, ()> {
    self.observer_order.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn rejected(
    &self,
    violation: PreconditionViolation,
  ) -> ExpansionOutcome {
    debug!("expansion_rejected::{}", violation);
    ExpansionOutcome::Rejected(violation)
  }

  fn discarded(
    &self,
    issued: u64,
    current: u64,
  ) -> ExpansionOutcome {
    debug!("response_discarded::issued::{}::current::{}", issued, current);
    ExpansionOutcome::Discarded { issued, current }
  }

  fn fetch_failed(
    &self,
    operation: &str,
    target: &str,
    e: DataServiceError,
  ) -> ExplorerError {
    error!("fetch_failed::{}::{}::error::{}", operation, target, e);
    ExplorerError::FetchFailed(e)
  }

  fn notify(
    &self,
    added: &ElementsAdded,
    transitions: &[CursorTransition],
  ) {
    self.observer.on_elements_added(added);
    for transition in transitions {
      self.observer.on_cursor_state_changed(
        &transition.node,
        transition.direction,
        transition.sort,
        transition.state,
      );
    }
  }

  /// Marks every edge of the fetched transaction as expanded, both in the
  /// incoming batch and among already committed edges. A seed batch is the
  /// whole starting graph, so none of its edges stays expandable.
  fn absorb_transaction(
    session: &mut SessionRoot,
    transaction_id: &str,
    mut batch: FlowBatch,
    seed: bool,
  ) -> (Vec<Node>, Vec<Edge>) {
    for edge in batch.edges.iter_mut().filter(|edge| seed || edge.transaction_id() == transaction_id) {
      edge.expandable = false;
    }
    let merged = session.absorb(batch);
    session.store.mark_transaction_expanded(transaction_id);
    (merged.nodes, merged.edges)
  }

  /// Replaces the session with a fresh one seeded from `input`.
  ///
  /// Malformed input is refused before anything is reset. Once the input is
  /// accepted the old session is gone even if the fetch then fails.
  #[instrument(level = "debug", skip(self))]
  pub async fn start_session(
    &self,
    input: &str,
  ) -> Result<ExpansionOutcome, ExplorerError> {
    let seed = SeedInput::classify(input)?;

    let generation = {
      let _order = self.order_observers();
      let generation = self.write().reset();
      self.observer.on_session_reset(generation);
      generation
    };

    match seed {
      SeedInput::Transaction(transaction_id) => {
        info!("start_session::transaction::{}::generation::{}", transaction_id, generation);
        let request = TransactionFlowsRequest {
          transaction_id: transaction_id.clone(),
          existing_nodes: Vec::new(),
          existing_edges: Vec::new(),
        };
        let result = self.data_service.fetch_transaction_flows(&request).await;

        let _order = self.order_observers();
        let added = {
          let mut session = self.write();
          if session.generation() != generation {
            return Ok(self.discarded(generation, session.generation()));
          }
          let batch = result.map_err(|e| self.fetch_failed("seed_transaction", &transaction_id, e))?;
          let (nodes, edges) = Self::absorb_transaction(&mut session, &transaction_id, batch, true);
          ElementsAdded {
            generation,
            nodes,
            edges,
            placement: PlacementHint::Seed,
          }
        };
        self.notify(&added, &[]);
        Ok(ExpansionOutcome::Applied(added))
      },
      SeedInput::Account(account) => {
        info!("start_session::account::{}::generation::{}", account, generation);
        let result = self.data_service.fetch_account_metadata(&account).await;

        let _order = self.order_observers();
        let added = {
          let mut session = self.write();
          if session.generation() != generation {
            return Ok(self.discarded(generation, session.generation()));
          }
          let metadata = result.map_err(|e| self.fetch_failed("seed_account", account.as_str(), e))?;
          let merged = session.absorb(FlowBatch {
            nodes: vec![metadata.into_node(account)],
            ..FlowBatch::default()
          });
          ElementsAdded {
            generation,
            nodes: merged.nodes,
            edges: merged.edges,
            placement: PlacementHint::Seed,
          }
        };
        self.notify(&added, &[]);
        Ok(ExpansionOutcome::Applied(added))
      },
    }
  }

  /// Fetches the next page of `node`'s flows for one (direction, sort) cursor.
  #[instrument(level = "debug", skip(self))]
  pub async fn expand_node(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Result<ExpansionOutcome, ExplorerError> {
    let (generation, request) = {
      let mut session = self.write();
      if !session.store.has_node(node) {
        return Ok(self.rejected(PreconditionViolation::UnknownNode(node.clone())));
      }
      let page = match session.tracker.begin(node, direction, sort) {
        Ok(page) => page,
        Err(violation) => return Ok(self.rejected(violation)),
      };
      let (existing_nodes, existing_edges) = session.existing_keys();
      let request = AccountFlowsRequest {
        account: node.clone(),
        direction,
        sort,
        limit: self.page_size,
        page,
        existing_nodes,
        existing_edges,
      };
      (session.generation(), request)
    };
    debug!("expand_node::{}::{}::{}::page::{}", node, direction, sort, request.page);

    let guard = InFlightGuard::new(self.session.clone(), generation, InFlightTarget::Cursor {
      node: node.clone(),
      direction,
      sort,
    });
    let result = self.data_service.fetch_account_flows(&request).await;
    guard.disarm();

    let _order = self.order_observers();
    let (added, transitions) = {
      let mut session = self.write();
      if session.generation() != generation {
        return Ok(self.discarded(generation, session.generation()));
      }
      let batch = match result {
        Ok(batch) => batch,
        Err(e) => {
          session.tracker.release(node, direction, sort);
          return Err(self.fetch_failed("expand_node", node.as_str(), e));
        },
      };
      let has_more = batch.has_more;
      let merged = session.absorb(batch);
      let transitions = session.tracker.complete(node, direction, sort, has_more);
      let added = ElementsAdded {
        generation,
        nodes: merged.nodes,
        edges: merged.edges,
        placement: PlacementHint::Anchor(node.clone()),
      };
      (added, transitions)
    };
    info!(
      "expand_node::{}::{}::{}::nodes::{}::edges::{}",
      node,
      direction,
      sort,
      added.nodes.len(),
      added.edges.len()
    );
    self.notify(&added, &transitions);
    Ok(ExpansionOutcome::Applied(added))
  }

  /// Fetches every flow of the transaction behind `edge`.
  #[instrument(level = "debug", skip(self))]
  pub async fn expand_edge(
    &self,
    edge: &EdgeKey,
  ) -> Result<ExpansionOutcome, ExplorerError> {
    let (generation, request) = {
      let mut session = self.write();
      match session.store.edge(edge).map(|committed| committed.expandable) {
        None => return Ok(self.rejected(PreconditionViolation::UnknownEdge(edge.clone()))),
        Some(false) => return Ok(self.rejected(PreconditionViolation::EdgeAlreadyExpanded(edge.clone()))),
        Some(true) => {},
      }
      if !session.edges_in_flight.insert(edge.clone()) {
        return Ok(self.rejected(PreconditionViolation::EdgeInFlight(edge.clone())));
      }
      let (existing_nodes, existing_edges) = session.existing_keys();
      let request = TransactionFlowsRequest {
        transaction_id: edge.transaction_id.clone(),
        existing_nodes,
        existing_edges,
      };
      (session.generation(), request)
    };
    debug!("expand_edge::{}", edge);

    let guard = InFlightGuard::new(self.session.clone(), generation, InFlightTarget::Edge(edge.clone()));
    let result = self.data_service.fetch_transaction_flows(&request).await;
    guard.disarm();

    let _order = self.order_observers();
    let added = {
      let mut session = self.write();
      if session.generation() != generation {
        return Ok(self.discarded(generation, session.generation()));
      }
      session.edges_in_flight.remove(edge);
      let batch = result.map_err(|e| self.fetch_failed("expand_edge", &edge.transaction_id, e))?;
      let (nodes, edges) = Self::absorb_transaction(&mut session, &edge.transaction_id, batch, false);
      ElementsAdded {
        generation,
        nodes,
        edges,
        placement: PlacementHint::Midpoint {
          source: edge.source.clone(),
          target: edge.target.clone(),
        },
      }
    };
    info!(
      "expand_edge::{}::nodes::{}::edges::{}",
      edge.transaction_id,
      added.nodes.len(),
      added.edges.len()
    );
    self.notify(&added, &[]);
    Ok(ExpansionOutcome::Applied(added))
  }

  pub fn generation(&self) -> u64 {
    self.read().generation()
  }

  pub fn page_size(&self) -> u32 {
    self.page_size
  }

  pub fn cursor_state(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Option<CursorState> {
    self.read().tracker.cursor_state(node, direction, sort)
  }

  /// All four cursors of `node`, in (in, out) x (asc, desc) order.
  pub fn cursor_states(
    &self,
    node: &NodeKey,
  ) -> Option<Vec<(FlowDirection, SortOrder, CursorState)>> {
    let session = self.read();
    let mut states = Vec::with_capacity(4);
    for direction in FlowDirection::ALL {
      for sort in SortOrder::ALL {
        states.push((direction, sort, session.tracker.cursor_state(node, direction, sort)?));
      }
    }
    Some(states)
  }

  pub fn is_expanding(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> bool {
    self.read().tracker.is_in_flight(node, direction, sort)
  }

  pub fn edge(
    &self,
    key: &EdgeKey,
  ) -> Option<Edge> {
    self.read().store.edge(key).cloned()
  }

  pub fn has_node(
    &self,
    key: &NodeKey,
  ) -> bool {
    self.read().store.has_node(key)
  }

  pub fn node_count(&self) -> usize {
    self.read().store.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.read().store.edge_count()
  }

  /// Edge keys in commit order.
  pub fn edge_keys(&self) -> Vec<EdgeKey> {
    self.read().store.edge_keys()
  }

  pub fn snapshot(&self) -> GraphSnapshot {
    let session = self.read();
    session.store.snapshot(session.generation())
  }
}
