use std::collections::HashSet;

use crate::model::EdgeKey;
use crate::model::FlowBatch;
use crate::storage::in_memory::DiffMerger;
use crate::storage::in_memory::GraphStore;
use crate::storage::in_memory::MergedElements;
use crate::storage::in_memory::PaginationTracker;

/// Everything one seed search accumulates. Replaced wholesale on reset.
#[derive(Debug, Default)]
pub struct SessionRoot {
  generation:          u64,
  pub store:           GraphStore,
  pub tracker:         PaginationTracker,
  pub edges_in_flight: HashSet<EdgeKey>,
}

impl SessionRoot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Drops all state and starts the next generation.
  pub fn reset(&mut self) -> u64 {
    let generation = self.generation + 1;
    *self = SessionRoot {
      generation,
      ..SessionRoot::default()
    };
    generation
  }

  /// Merges `batch` and gives every new node its four cursors.
  pub fn absorb(
    &mut self,
    batch: FlowBatch,
  ) -> MergedElements {
    let merged = DiffMerger::merge(&mut self.store, batch);
    for node in &merged.nodes {
      self.tracker.track(&node.key);
    }
    merged
  }

  /// Key strings sent to the service as the "already known" hint.
  pub fn existing_keys(&self) -> (Vec<String>, Vec<String>) {
    let nodes = self.store.node_keys().into_iter().map(String::from).collect();
    let edges = self.store.edge_keys().iter().map(ToString::to_string).collect();
    (nodes, edges)
  }
}
