use std::collections::HashMap;

use crate::model::Cursor;
use crate::model::CursorState;
use crate::model::CursorTransition;
use crate::model::FlowDirection;
use crate::model::NodeKey;
use crate::model::PreconditionViolation;
use crate::model::SortOrder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CursorSlot {
  cursor: Cursor,
  in_flight: bool,
}

/// The four scans of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
  in_asc: CursorSlot,
  in_desc: CursorSlot,
  out_asc: CursorSlot,
  out_desc: CursorSlot,
}

impl PaginationState {
  fn slot(
    &self,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> &CursorSlot {
    match (direction, sort) {
      (FlowDirection::In, SortOrder::Asc) => &self.in_asc,
      (FlowDirection::In, SortOrder::Desc) => &self.in_desc,
      (FlowDirection::Out, SortOrder::Asc) => &self.out_asc,
      (FlowDirection::Out, SortOrder::Desc) => &self.out_desc,
    }
  }

  fn slot_mut(
    &mut self,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> &mut CursorSlot {
    match (direction, sort) {
      (FlowDirection::In, SortOrder::Asc) => &mut self.in_asc,
      (FlowDirection::In, SortOrder::Desc) => &mut self.in_desc,
      (FlowDirection::Out, SortOrder::Asc) => &mut self.out_asc,
      (FlowDirection::Out, SortOrder::Desc) => &mut self.out_desc,
    }
  }

  pub fn cursor(
    &self,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Cursor {
    self.slot(direction, sort).cursor
  }
}

/// Per-node cursor state machines plus the per-cursor in-flight lock.
#[derive(Debug, Clone, Default)]
pub struct PaginationTracker {
  states: HashMap<NodeKey, PaginationState>,
}

impl PaginationTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates the four `Pending` cursors of `node` on first observation.
  pub fn track(
    &mut self,
    node: &NodeKey,
  ) -> bool {
    if self.states.contains_key(node) {
      return false;
    }
    self.states.insert(node.clone(), PaginationState::default());
    true
  }

  pub fn is_tracked(
    &self,
    node: &NodeKey,
  ) -> bool {
    self.states.contains_key(node)
  }

  pub fn len(&self) -> usize {
    self.states.len()
  }

  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }

  pub fn cursor(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Option<Cursor> {
    self.states.get(node).map(|state| state.cursor(direction, sort))
  }

  pub fn cursor_state(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Option<CursorState> {
    self.cursor(node, direction, sort).map(|cursor| cursor.state())
  }

  pub fn is_in_flight(
    &self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> bool {
    self.states.get(node).is_some_and(|state| state.slot(direction, sort).in_flight)
  }

  /// Locks the cursor for one request and returns the page to ask for.
  pub fn begin(
    &mut self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) -> Result<u32, PreconditionViolation> {
    let Some(state) = self.states.get_mut(node) else {
      return Err(PreconditionViolation::UnknownNode(node.clone()));
    };
    let slot = state.slot_mut(direction, sort);
    let Some(page) = slot.cursor.next_page() else {
      return Err(PreconditionViolation::CursorExhausted {
        node: node.clone(),
        direction,
        sort,
      });
    };
    if slot.in_flight {
      return Err(PreconditionViolation::CursorInFlight {
        node: node.clone(),
        direction,
        sort,
      });
    }
    slot.in_flight = true;
    Ok(page)
  }

  /// Applies a successful response and unlocks the cursor.
  ///
  /// Running out of results in one sort order exhausts the other sort order
  /// of the same direction too: both scan the same ordered set from opposite
  /// ends, so nothing new is left on the other side.
  pub fn complete(
    &mut self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
    has_more: bool,
  ) -> Vec<CursorTransition> {
    let mut transitions = Vec::new();
    let Some(state) = self.states.get_mut(node) else {
      return transitions;
    };

    let slot = state.slot_mut(direction, sort);
    slot.in_flight = false;
    let before = slot.cursor;
    slot.cursor = before.advance(has_more);
    if slot.cursor != before {
      transitions.push(CursorTransition {
        node: node.clone(),
        direction,
        sort,
        state: slot.cursor.state(),
      });
    }

    if !has_more {
      let sibling_sort = sort.opposite();
      let sibling = state.slot_mut(direction, sibling_sort);
      let before = sibling.cursor;
      sibling.cursor = before.exhaust();
      if sibling.cursor != before {
        transitions.push(CursorTransition {
          node: node.clone(),
          direction,
          sort: sibling_sort,
          state: sibling.cursor.state(),
        });
      }
    }
    transitions
  }

  /// Unlocks the cursor without a transition (failed or abandoned request).
  pub fn release(
    &mut self,
    node: &NodeKey,
    direction: FlowDirection,
    sort: SortOrder,
  ) {
    if let Some(state) = self.states.get_mut(node) {
      state.slot_mut(direction, sort).in_flight = false;
    }
  }
}
