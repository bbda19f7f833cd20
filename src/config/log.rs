use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
  // Directory where logs will be stored
  pub directory: Option<String>,
}

impl LoggingConfig {
  pub fn base_dir(&self) -> &Path {
    Path::new(self.directory.as_deref().unwrap_or(".logs"))
  }
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      directory: Some(".logs".to_string()),
    }
  }
}
