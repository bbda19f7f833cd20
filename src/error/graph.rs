use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  #[error("[Graph] Malformed {kind} key: {value:?}")]
  MalformedKey { kind: &'static str, value: String },
  #[error("[Graph] Unknown flow direction: {0} (expected `in` or `out`)")]
  UnknownDirection(String),
  #[error("[Graph] Unknown sort order: {0} (expected `asc` or `desc`)")]
  UnknownSortOrder(String),
}
