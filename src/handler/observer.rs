use tracing::info;

use crate::model::CursorState;
use crate::model::ElementsAdded;
use crate::model::FlowDirection;
use crate::model::NodeKey;
use crate::model::PlacementHint;
use crate::model::SortOrder;

/// Callbacks of whatever draws the graph. Invoked outside the session lock,
/// in the order the changes were applied.
pub trait GraphObserver: Send + Sync {
  fn on_session_reset(
    &self,
    _generation: u64,
  ) {
  }

  fn on_elements_added(
    &self,
    _added: &ElementsAdded,
  ) {
  }

  fn on_cursor_state_changed(
    &self,
    _node: &NodeKey,
    _direction: FlowDirection,
    _sort: SortOrder,
    _state: CursorState,
  ) {
  }
}

pub struct NoopObserver;

impl GraphObserver for NoopObserver {}

/// Renders changes as log lines.
pub struct TracingObserver;

impl GraphObserver for TracingObserver {
  fn on_session_reset(
    &self,
    generation: u64,
  ) {
    info!("session_reset::generation::{}", generation);
  }

  fn on_elements_added(
    &self,
    added: &ElementsAdded,
  ) {
    let anchor = match &added.placement {
      PlacementHint::Seed => "seed".to_string(),
      PlacementHint::Anchor(node) => format!("anchor::{}", node.short()),
      PlacementHint::Midpoint { source, target } => format!("midpoint::{}::{}", source.short(), target.short()),
    };
    info!(
      "elements_added::generation::{}::{}::nodes::{}::edges::{}",
      added.generation,
      anchor,
      added.nodes.len(),
      added.edges.len()
    );
    for node in &added.nodes {
      info!("node_added::{}::label::{}", node.key, node.display_label);
    }
    for edge in &added.edges {
      info!(
        "edge_added::{}::{}::{}::{} {}::expandable::{}",
        edge.transaction_id(),
        edge.source().short(),
        edge.target().short(),
        edge.amount,
        edge.asset_ticker.as_deref().unwrap_or(edge.asset_id()),
        edge.expandable
      );
    }
  }

  fn on_cursor_state_changed(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
    state: CursorState,
  ) {
    info!(
      "cursor_changed::{}::{}::{}::has_more::{}::page::{}",
      node, direction, sort, state.has_more, state.page
    );
  }
}
