use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::NATIVE_ASSET_ID;
use crate::error::DataServiceError;
use crate::model::AccountMetadata;
use crate::model::Edge;
use crate::model::FlowBatch;
use crate::model::Node;
use crate::model::NodeKey;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingElements<'a> {
  pub existing_nodes: &'a [String],
  pub existing_edges: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireNode {
  pub pubkey: String,
  #[serde(default)]
  pub label:  Option<String>,
  #[serde(default, alias = "imgUrl")]
  pub img_url: Option<String>,
  #[serde(default)]
  pub tags:   Option<Vec<String>>,
  #[serde(default, rename = "type")]
  pub kind:   Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
  pub source:        String,
  pub target:        String,
  pub amount:        f64,
  #[serde(default)]
  pub mint:          Option<String>,
  #[serde(default)]
  pub ticker:        Option<String>,
  #[serde(default)]
  pub label:         Option<String>,
  #[serde(default)]
  pub value:         Option<f64>,
  #[serde(default)]
  pub tx_id:         Option<String>,
  #[serde(default, rename = "type")]
  pub kind:          Option<String>,
  #[serde(default)]
  pub program_label: Option<String>,
  #[serde(default)]
  pub token_image:   Option<String>,
  #[serde(default)]
  pub tags:          Option<Vec<String>>,
  #[serde(default)]
  pub is_expandable: Option<bool>,
}

/// Response body of both flow endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFlowPage {
  #[serde(default)]
  pub nodes:    Vec<WireNode>,
  #[serde(default, alias = "links")]
  pub edges:    Vec<WireEdge>,
  #[serde(default)]
  pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAccount {
  #[serde(default)]
  pub label:   Option<String>,
  #[serde(default, alias = "imgUrl")]
  pub img_url: Option<String>,
  #[serde(default)]
  pub tags:    Option<Vec<String>>,
  #[serde(default, rename = "type")]
  pub kind:    Option<String>,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireError {
  #[serde(default)]
  pub error:  Option<String>,
  #[serde(default)]
  pub detail: Option<serde_json::Value>,
}

impl WireError {
  pub fn describe(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<WireError>(body) else {
      return body.chars().take(200).collect();
    };
    match (parsed.error, parsed.detail) {
      (Some(error), _) => error,
      (None, Some(serde_json::Value::String(detail))) => detail,
      (None, Some(detail)) => detail.to_string(),
      (None, None) => body.chars().take(200).collect(),
    }
  }
}

fn invalid(reason: impl std::fmt::Display) -> DataServiceError {
  DataServiceError::InvalidPayload(reason.to_string())
}

impl WireNode {
  pub fn into_node(self) -> Result<Node, DataServiceError> {
    let key = NodeKey::new(self.pubkey).map_err(invalid)?;
    let mut node = Node::new(key).with_label(self.label).with_tags(self.tags.unwrap_or_default());
    node.image_url = self.img_url;
    node.kind = self.kind;
    Ok(node)
  }
}

impl WireEdge {
  /// `transaction_id` fills in a missing `txId`; account pages have no such
  /// fallback and must name the transaction of every edge.
  pub fn into_edge(
    self,
    transaction_id: Option<&str>,
  ) -> Result<Edge, DataServiceError> {
    let tx_id = match (self.tx_id, transaction_id) {
      (Some(tx_id), _) => tx_id,
      (None, Some(fallback)) => fallback.to_string(),
      (None, None) => return Err(invalid(format!("edge {} -> {} has no txId", self.source, self.target))),
    };
    let source = NodeKey::new(self.source).map_err(invalid)?;
    let target = NodeKey::new(self.target).map_err(invalid)?;
    let asset_id = self.mint.filter(|mint| !mint.is_empty()).unwrap_or_else(|| NATIVE_ASSET_ID.to_string());

    let mut edge = Edge::new(tx_id, source, target, asset_id, self.amount).map_err(invalid)?;
    edge.asset_ticker = self.ticker;
    edge.label = self.label;
    edge.usd_value = self.value;
    edge.expandable = self.is_expandable.unwrap_or(true);
    edge.kind = self.kind;
    edge.program_label = self.program_label;
    edge.token_image = self.token_image;
    edge.tags = self.tags.unwrap_or_default().into_iter().collect::<BTreeSet<_>>();
    Ok(edge)
  }
}

impl WireFlowPage {
  pub fn into_batch(
    self,
    transaction_id: Option<&str>,
  ) -> Result<FlowBatch, DataServiceError> {
    let nodes = self.nodes.into_iter().map(WireNode::into_node).collect::<Result<Vec<_>, _>>()?;
    let edges =
      self.edges.into_iter().map(|edge| edge.into_edge(transaction_id)).collect::<Result<Vec<_>, _>>()?;
    Ok(FlowBatch {
      nodes,
      edges,
      has_more: self.has_more,
    })
  }
}

impl From<WireAccount> for AccountMetadata {
  fn from(account: WireAccount) -> Self {
    AccountMetadata {
      label:     account.label,
      image_url: account.img_url,
      tags:      account.tags.unwrap_or_default(),
      kind:      account.kind,
    }
  }
}
