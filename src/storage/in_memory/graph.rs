use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::graph::EdgeIndex;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::model::Edge;
use crate::model::EdgeKey;
use crate::model::GraphSnapshot;
use crate::model::Node;
use crate::model::NodeKey;

/// Deduplicated nodes and edges of one session.
///
/// Elements live in a petgraph arena and are addressed through the two key
/// indices; nothing is ever removed, so indices stay valid for the lifetime of
/// the store and iteration order is commit order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
  graph: DiGraph<Node, Edge>,
  node_indices: HashMap<NodeKey, NodeIndex>,
  edge_indices: HashMap<EdgeKey, EdgeIndex>,
}

impl GraphStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn has_node(
    &self,
    key: &NodeKey,
  ) -> bool {
    self.node_indices.contains_key(key)
  }

  pub fn has_edge(
    &self,
    key: &EdgeKey,
  ) -> bool {
    self.edge_indices.contains_key(key)
  }

  pub fn node(
    &self,
    key: &NodeKey,
  ) -> Option<&Node> {
    self.node_indices.get(key).and_then(|&idx| self.graph.node_weight(idx))
  }

  pub fn edge(
    &self,
    key: &EdgeKey,
  ) -> Option<&Edge> {
    self.edge_indices.get(key).and_then(|&idx| self.graph.edge_weight(idx))
  }

  /// Inserts `node` unless its key is already present. Returns whether it
  /// was inserted.
  pub fn commit_node(
    &mut self,
    node: Node,
  ) -> bool {
    if self.node_indices.contains_key(&node.key) {
      return false;
    }
    let key = node.key.clone();
    let idx = self.graph.add_node(node);
    self.node_indices.insert(key, idx);
    true
  }

  /// Returns the nodes that were not present yet, in submission order.
  pub fn commit_nodes(
    &mut self,
    nodes: impl IntoIterator<Item = Node>,
  ) -> Vec<Node> {
    let mut committed = Vec::new();
    for node in nodes {
      if self.commit_node(node.clone()) {
        committed.push(node);
      }
    }
    committed
  }

  /// Returns the edges that were not present yet, in submission order.
  ///
  /// Endpoints that were never committed get a placeholder node so that no
  /// edge dangles.
  pub fn commit_edges(
    &mut self,
    edges: impl IntoIterator<Item = Edge>,
  ) -> Vec<Edge> {
    let mut committed = Vec::new();
    for edge in edges {
      if self.edge_indices.contains_key(&edge.key) {
        continue;
      }
      let source = self.ensure_node(edge.source());
      let target = self.ensure_node(edge.target());
      let key = edge.key.clone();
      let idx = self.graph.add_edge(source, target, edge.clone());
      self.edge_indices.insert(key, idx);
      committed.push(edge);
    }
    committed
  }

  fn ensure_node(
    &mut self,
    key: &NodeKey,
  ) -> NodeIndex {
    if let Some(&idx) = self.node_indices.get(key) {
      return idx;
    }
    let idx = self.graph.add_node(Node::new(key.clone()));
    self.node_indices.insert(key.clone(), idx);
    idx
  }

  /// Flags every edge of `transaction_id` as already expanded. Returns how
  /// many edges changed.
  pub fn mark_transaction_expanded(
    &mut self,
    transaction_id: &str,
  ) -> usize {
    let mut changed = 0;
    for edge in self.graph.edge_weights_mut() {
      if edge.expandable && edge.transaction_id() == transaction_id {
        edge.expandable = false;
        changed += 1;
      }
    }
    changed
  }

  /// Keys of every edge touching `key`, outgoing first.
  pub fn incident_edges(
    &self,
    key: &NodeKey,
  ) -> Vec<EdgeKey> {
    let Some(&idx) = self.node_indices.get(key) else {
      return Vec::new();
    };
    let outgoing = self.graph.edges_directed(idx, Direction::Outgoing);
    // Self-loops show up in both directions; keep them once.
    let incoming = self
      .graph
      .edges_directed(idx, Direction::Incoming)
      .filter(|e| e.source() != e.target());
    outgoing.chain(incoming).map(|e| e.weight().key.clone()).collect()
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn node_keys(&self) -> Vec<NodeKey> {
    self.graph.node_weights().map(|node| node.key.clone()).collect()
  }

  pub fn edge_keys(&self) -> Vec<EdgeKey> {
    self.graph.edge_weights().map(|edge| edge.key.clone()).collect()
  }

  pub fn snapshot(
    &self,
    generation: u64,
  ) -> GraphSnapshot {
    GraphSnapshot {
      generation,
      nodes: self.graph.node_weights().cloned().collect(),
      edges: self.graph.edge_weights().cloned().collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::test_utils::assertions::TestAssertions;
  use crate::test_utils::fixtures::TestFixtures;

  #[test]
  fn commit_is_idempotent() {
    let mut store = GraphStore::new();

    let first = store.commit_nodes(vec![TestFixtures::node("A"), TestFixtures::node("B")]);
    assert_eq!(first.len(), 2);

    let again = store.commit_nodes(vec![TestFixtures::node("B"), TestFixtures::node("C")]);
    assert_eq!(again, vec![TestFixtures::node("C")]);
    assert_eq!(store.node_count(), 3);
  }

  #[test]
  fn duplicate_within_one_batch_is_committed_once() {
    let mut store = GraphStore::new();
    let edge = TestFixtures::edge("T1", "A", "B", "USDC", 100.0);

    let committed = store.commit_edges(vec![edge.clone(), edge.clone()]);

    assert_eq!(committed, vec![edge]);
    assert_eq!(store.edge_count(), 1);
  }

  #[test]
  fn same_pair_in_distinct_transfers_are_distinct_edges() {
    let mut store = GraphStore::new();
    store.commit_nodes(vec![TestFixtures::node("A"), TestFixtures::node("B")]);

    let committed = store.commit_edges(vec![
      TestFixtures::edge("T1", "A", "B", "USDC", 100.0),
      TestFixtures::edge("T2", "A", "B", "USDC", 100.0),
      TestFixtures::edge("T1", "A", "B", "SOL", 100.0),
      TestFixtures::edge("T1", "A", "B", "USDC", 7.0),
    ]);

    assert_eq!(committed.len(), 4);
    assert_eq!(store.incident_edges(&TestFixtures::key("A")).len(), 4);
  }

  #[test]
  fn dangling_endpoints_get_placeholder_nodes() {
    let mut store = GraphStore::new();
    store.commit_edges(vec![TestFixtures::edge("T1", "A", "Zr9qPlaceholderKey", "SOL", 1.0)]);

    let placeholder = store.node(&TestFixtures::key("Zr9qPlaceholderKey")).unwrap();
    assert_eq!(placeholder.display_label, "Zr9q...rKey");
    TestAssertions::assert_store_consistent(&store);
  }

  #[test]
  fn marks_every_edge_of_a_transaction() {
    let mut store = GraphStore::new();
    store.commit_edges(vec![
      TestFixtures::edge("T1", "A", "B", "USDC", 100.0),
      TestFixtures::edge("T1", "B", "C", "USDC", 99.0),
      TestFixtures::edge("T2", "A", "C", "SOL", 5.0),
    ]);

    assert_eq!(store.mark_transaction_expanded("T1"), 2);
    assert_eq!(store.mark_transaction_expanded("T1"), 0);

    let t2 = TestFixtures::edge("T2", "A", "C", "SOL", 5.0);
    assert!(store.edge(&t2.key).unwrap().expandable);
  }

  #[test]
  fn self_loop_is_listed_once() {
    let mut store = GraphStore::new();
    store.commit_edges(vec![TestFixtures::edge("T1", "A", "A", "SOL", 1.0)]);
    assert_eq!(store.incident_edges(&TestFixtures::key("A")).len(), 1);
  }

  #[test]
  fn snapshot_keeps_commit_order() {
    let mut store = GraphStore::new();
    store.commit_nodes(vec![TestFixtures::node("B"), TestFixtures::node("A")]);

    let snapshot = store.snapshot(3);

    assert_eq!(snapshot.generation, 3);
    let keys: Vec<_> = snapshot.nodes.iter().map(|n| n.key.as_str().to_string()).collect();
    assert_eq!(keys, vec!["B", "A"]);
  }
}
