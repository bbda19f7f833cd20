use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::GraphError;

/// Flow direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
  In,
  Out,
}

impl FlowDirection {
  pub const ALL: [FlowDirection; 2] = [FlowDirection::In, FlowDirection::Out];

  pub fn as_str(&self) -> &'static str {
    match self {
      FlowDirection::In => "in",
      FlowDirection::Out => "out",
    }
  }
}

impl FromStr for FlowDirection {
  type Err = GraphError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "in" => Ok(FlowDirection::In),
      "out" => Ok(FlowDirection::Out),
      other => Err(GraphError::UnknownDirection(other.to_string())),
    }
  }
}

impl fmt::Display for FlowDirection {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Scanning direction over the same ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  Desc,
}

impl SortOrder {
  pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

  pub fn as_str(&self) -> &'static str {
    match self {
      SortOrder::Asc => "asc",
      SortOrder::Desc => "desc",
    }
  }

  pub fn opposite(&self) -> SortOrder {
    match self {
      SortOrder::Asc => SortOrder::Desc,
      SortOrder::Desc => SortOrder::Asc,
    }
  }
}

impl FromStr for SortOrder {
  type Err = GraphError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "asc" => Ok(SortOrder::Asc),
      "desc" => Ok(SortOrder::Desc),
      other => Err(GraphError::UnknownSortOrder(other.to_string())),
    }
  }
}

impl fmt::Display for SortOrder {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Pagination progress of one (node, direction, sort) scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Cursor {
  /// Nothing fetched yet; the next request asks for page 1.
  #[default]
  Pending,
  /// `page` is the next page to request.
  MoreAvailable { page: u32 },
  /// Terminal. `page` is where the scan stopped and never goes down.
  Exhausted { page: u32 },
}

impl Cursor {
  /// Page to request next, `None` once exhausted.
  pub fn next_page(&self) -> Option<u32> {
    match self {
      Cursor::Pending => Some(1),
      Cursor::MoreAvailable { page } => Some(*page),
      Cursor::Exhausted { .. } => None,
    }
  }

  pub fn is_exhausted(&self) -> bool {
    matches!(self, Cursor::Exhausted { .. })
  }

  /// Transition after a successful fetch of `next_page()`.
  pub fn advance(
    self,
    has_more: bool,
  ) -> Cursor {
    match self.next_page() {
      Some(fetched) if has_more => Cursor::MoreAvailable { page: fetched + 1 },
      Some(fetched) => Cursor::Exhausted { page: fetched },
      None => self,
    }
  }

  /// Terminal without a fetch of its own; used for the sibling sort order.
  pub fn exhaust(self) -> Cursor {
    match self.next_page() {
      Some(page) => Cursor::Exhausted { page },
      None => self,
    }
  }

  pub fn state(&self) -> CursorState {
    match self {
      Cursor::Pending => CursorState { has_more: true, page: 1 },
      Cursor::MoreAvailable { page } => CursorState { has_more: true, page: *page },
      Cursor::Exhausted { page } => CursorState {
        has_more: false,
        page: *page,
      },
    }
  }
}

/// What the rendering side needs to enable or disable an expansion
/// affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorState {
  pub has_more: bool,
  pub page: u32,
}
