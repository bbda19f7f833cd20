use serde::Deserialize;
use serde::Serialize;

fn default_timeout_ms() -> u64 {
  30_000
}

fn default_max_retries() -> usize {
  3
}

fn default_base_retry_delay_ms() -> u64 {
  250
}

fn default_max_retry_delay_ms() -> u64 {
  5_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
  pub base_url:            String,
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms:          u64,
  // Retries after the first attempt
  #[serde(default = "default_max_retries")]
  pub max_retries:         usize,
  #[serde(default = "default_base_retry_delay_ms")]
  pub base_retry_delay_ms: u64,
  #[serde(default = "default_max_retry_delay_ms")]
  pub max_retry_delay_ms:  u64,
}

impl DataServiceConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url:            base_url.into(),
      timeout_ms:          default_timeout_ms(),
      max_retries:         default_max_retries(),
      base_retry_delay_ms: default_base_retry_delay_ms(),
      max_retry_delay_ms:  default_max_retry_delay_ms(),
    }
  }
}
