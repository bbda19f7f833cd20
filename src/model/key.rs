use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::GraphError;

fn validate(
  kind: &'static str,
  value: &str,
) -> Result<(), GraphError> {
  if value.is_empty() || value.trim() != value {
    return Err(GraphError::MalformedKey {
      kind,
      value: value.to_string(),
    });
  }
  Ok(())
}

/// Address of a node, usually an account public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeKey(String);

impl NodeKey {
  pub fn new(value: impl Into<String>) -> Result<Self, GraphError> {
    let value = value.into();
    validate("node", &value)?;
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// `abcd...wxyz`, or the whole key when it is too short to abbreviate.
  pub fn short(&self) -> String {
    let chars: Vec<char> = self.0.chars().collect();
    if chars.len() <= 8 {
      return self.0.clone();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
  }
}

impl TryFrom<String> for NodeKey {
  type Error = GraphError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<NodeKey> for String {
  fn from(key: NodeKey) -> Self {
    key.0
  }
}

impl AsRef<str> for NodeKey {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for NodeKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identity of a transfer edge.
///
/// One transaction can move the same amount of the same asset between the same
/// two parties through several instructions, and several transactions can link
/// the same pair, so all five components take part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
  pub transaction_id: String,
  pub source: NodeKey,
  pub target: NodeKey,
  pub asset_id: String,
  pub amount: String,
}

impl EdgeKey {
  pub fn new(
    transaction_id: impl Into<String>,
    source: NodeKey,
    target: NodeKey,
    asset_id: impl Into<String>,
    amount: f64,
  ) -> Result<Self, GraphError> {
    let transaction_id = transaction_id.into();
    let asset_id = asset_id.into();
    validate("transaction", &transaction_id)?;
    validate("asset", &asset_id)?;
    Ok(Self {
      transaction_id,
      source,
      target,
      asset_id,
      amount: canonical_amount(amount),
    })
  }
}

/// Shortest round-trip rendering of an amount, with `-0` folded into `0`.
pub fn canonical_amount(amount: f64) -> String {
  if amount == 0.0 {
    return "0".to_string();
  }
  format!("{}", amount)
}

// txId-source-target-assetId-amount, the form the data service expects in
// `existingEdges`.
impl fmt::Display for EdgeKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{}-{}-{}-{}-{}",
      self.transaction_id, self.source, self.target, self.asset_id, self.amount
    )
  }
}
