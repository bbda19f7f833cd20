use crate::model::Edge;
use crate::model::FlowBatch;
use crate::model::Node;
use crate::model::NodeKey;

/// Test fixtures for creating consistent test data
pub struct TestFixtures;

impl TestFixtures {
  pub fn key(value: &str) -> NodeKey {
    NodeKey::new(value).expect("fixture node key")
  }

  pub fn node(key: &str) -> Node {
    Node::new(Self::key(key))
  }

  pub fn labelled_node(
    key: &str,
    label: &str,
  ) -> Node {
    Self::node(key).with_label(Some(label.to_string()))
  }

  pub fn edge(
    transaction_id: &str,
    source: &str,
    target: &str,
    asset_id: &str,
    amount: f64,
  ) -> Edge {
    Edge::new(transaction_id, Self::key(source), Self::key(target), asset_id, amount).expect("fixture edge")
  }

  pub fn batch(
    nodes: &[&str],
    edges: Vec<Edge>,
    has_more: bool,
  ) -> FlowBatch {
    FlowBatch {
      nodes: nodes.iter().map(|key| Self::node(key)).collect(),
      edges,
      has_more,
    }
  }
}
