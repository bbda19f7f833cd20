use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
  // Flows requested per account page
  pub page_size: u32,
}

impl Default for ExplorerConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}
