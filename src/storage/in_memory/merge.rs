use crate::model::Edge;
use crate::model::FlowBatch;
use crate::model::Node;
use crate::storage::in_memory::graph::GraphStore;

/// Elements of a batch that were not in the store before the merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedElements {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl MergedElements {
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }
}

pub struct DiffMerger;

impl DiffMerger {
  /// Commits `batch` into `store` and returns only the net-new elements.
  ///
  /// Nodes go first so edges always find their endpoints. An endpoint the
  /// batch does not describe becomes a placeholder node labelled with its
  /// shortened key; it is reported with the other new nodes.
  pub fn merge(
    store: &mut GraphStore,
    batch: FlowBatch,
  ) -> MergedElements {
    let mut nodes = store.commit_nodes(batch.nodes);

    for edge in &batch.edges {
      for endpoint in [edge.source(), edge.target()] {
        let placeholder = Node::new(endpoint.clone());
        if store.commit_node(placeholder.clone()) {
          nodes.push(placeholder);
        }
      }
    }

    let edges = store.commit_edges(batch.edges);
    MergedElements { nodes, edges }
  }
}
