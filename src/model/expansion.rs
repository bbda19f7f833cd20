use thiserror::Error;

use super::cursor::CursorState;
use super::cursor::FlowDirection;
use super::cursor::SortOrder;
use super::graph::Edge;
use super::graph::Node;
use super::key::EdgeKey;
use super::key::NodeKey;

/// Why an expansion was refused before reaching the network.
///
/// These come from ordinary UI races (a stale click on a disabled button, a
/// double click) and are reported as outcomes, never as user-facing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
  #[error("node {0} is not part of the graph")]
  UnknownNode(NodeKey),
  #[error("edge {0} is not part of the graph")]
  UnknownEdge(EdgeKey),
  #[error("cursor {node}/{direction}/{sort} is exhausted")]
  CursorExhausted {
    node: NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  },
  #[error("cursor {node}/{direction}/{sort} already has a request in flight")]
  CursorInFlight {
    node: NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  },
  #[error("edge {0} was already expanded")]
  EdgeAlreadyExpanded(EdgeKey),
  #[error("edge {0} already has a request in flight")]
  EdgeInFlight(EdgeKey),
}

/// Where the renderer should place newly added elements. Positions belong to
/// the renderer, so the hint only names the elements to anchor on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementHint {
  /// Initial graph of a session; lay out freely.
  Seed,
  /// Around the node that was expanded.
  Anchor(NodeKey),
  /// Around the midpoint between the two endpoints of the expanded edge.
  Midpoint { source: NodeKey, target: NodeKey },
}

/// Net-new elements of one successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementsAdded {
  pub generation: u64,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
  pub placement: PlacementHint,
}

impl ElementsAdded {
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTransition {
  pub node: NodeKey,
  pub direction: FlowDirection,
  pub sort: SortOrder,
  pub state: CursorState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpansionOutcome {
  Applied(ElementsAdded),
  Rejected(PreconditionViolation),
  /// The response belonged to a session that was reset while it was in flight.
  Discarded { issued: u64, current: u64 },
}

impl ExpansionOutcome {
  pub fn applied(&self) -> Option<&ElementsAdded> {
    match self {
      ExpansionOutcome::Applied(added) => Some(added),
      _ => None,
    }
  }

  pub fn is_applied(&self) -> bool {
    matches!(self, ExpansionOutcome::Applied(_))
  }
}
