use std::collections::HashSet;

use crate::storage::in_memory::GraphStore;

/// Custom assertions for domain-specific testing
pub struct TestAssertions;

impl TestAssertions {
  /// Every edge endpoint is a committed node and no key appears twice.
  pub fn assert_store_consistent(store: &GraphStore) {
    let node_keys = store.node_keys();
    let unique_nodes: HashSet<_> = node_keys.iter().collect();
    assert_eq!(unique_nodes.len(), node_keys.len(), "duplicate node keys in store");
    assert_eq!(node_keys.len(), store.node_count());

    let edge_keys = store.edge_keys();
    let unique_edges: HashSet<_> = edge_keys.iter().collect();
    assert_eq!(unique_edges.len(), edge_keys.len(), "duplicate edge keys in store");
    assert_eq!(edge_keys.len(), store.edge_count());

    for edge_key in &edge_keys {
      assert!(store.has_node(&edge_key.source), "edge {} has dangling source", edge_key);
      assert!(store.has_node(&edge_key.target), "edge {} has dangling target", edge_key);
    }
  }
}
