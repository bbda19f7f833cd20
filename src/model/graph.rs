use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use super::key::EdgeKey;
use super::key::NodeKey;
use crate::error::GraphError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
  pub key: NodeKey,
  pub display_label: String,
  pub image_url: Option<String>,
  pub tags: BTreeSet<String>,
  pub kind: Option<String>,
}

impl Node {
  pub fn new(key: NodeKey) -> Self {
    Self {
      display_label: key.short(),
      key,
      image_url: None,
      tags: BTreeSet::new(),
      kind: None,
    }
  }

  /// Blank labels fall back to the shortened key.
  pub fn with_label(
    mut self,
    label: Option<String>,
  ) -> Self {
    if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
      self.display_label = label;
    }
    self
  }

  pub fn with_tags(
    mut self,
    tags: impl IntoIterator<Item = String>,
  ) -> Self {
    self.tags.extend(tags);
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
  pub key: EdgeKey,
  pub amount: f64,
  pub asset_ticker: Option<String>,
  pub label: Option<String>,
  pub usd_value: Option<f64>,
  pub expandable: bool,
  pub kind: Option<String>,
  pub program_label: Option<String>,
  pub token_image: Option<String>,
  pub tags: BTreeSet<String>,
}

impl Edge {
  pub fn new(
    transaction_id: impl Into<String>,
    source: NodeKey,
    target: NodeKey,
    asset_id: impl Into<String>,
    amount: f64,
  ) -> Result<Self, GraphError> {
    let key = EdgeKey::new(transaction_id, source, target, asset_id, amount)?;
    Ok(Self {
      key,
      amount,
      asset_ticker: None,
      label: None,
      usd_value: None,
      expandable: true,
      kind: None,
      program_label: None,
      token_image: None,
      tags: BTreeSet::new(),
    })
  }

  pub fn source(&self) -> &NodeKey {
    &self.key.source
  }

  pub fn target(&self) -> &NodeKey {
    &self.key.target
  }

  pub fn transaction_id(&self) -> &str {
    &self.key.transaction_id
  }

  pub fn asset_id(&self) -> &str {
    &self.key.asset_id
  }
}

/// One page of related entities as returned by the data service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowBatch {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
  /// Only meaningful for account flow pages.
  pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountMetadata {
  pub label: Option<String>,
  pub image_url: Option<String>,
  pub tags: Vec<String>,
  pub kind: Option<String>,
}

impl AccountMetadata {
  pub fn into_node(
    self,
    key: NodeKey,
  ) -> Node {
    let mut node = Node::new(key).with_label(self.label).with_tags(self.tags);
    node.image_url = self.image_url;
    node.kind = self.kind;
    node
  }
}

/// Every committed element of a session, in commit order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
  pub generation: u64,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}
