pub mod data_service;
pub mod explorer;
pub mod log;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

pub use data_service::DataServiceConfig;
pub use explorer::ExplorerConfig;
pub use log::LoggingConfig;

use crate::constants::DATA_SERVICE_URL_ENV;
use crate::err_with_loc;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  pub data_service: DataServiceConfig,
  #[serde(default)]
  pub explorer:     ExplorerConfig,
  #[serde(default)]
  pub logging:      LoggingConfig,
}

impl Config {
  pub fn from_toml(config_str: &str) -> crate::Result<Config> {
    let mut config: Config =
      toml::from_str(config_str).map_err(|e| err_with_loc!(ConfigError::ParseError(e.to_string())))?;

    if let Ok(base_url) = std::env::var(DATA_SERVICE_URL_ENV) {
      if !base_url.trim().is_empty() {
        config.data_service.base_url = base_url.trim().to_string();
      }
    }

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> crate::Result<()> {
    if self.explorer.page_size == 0 {
      return Err(err_with_loc!(ConfigError::InvalidValue {
        field:  "explorer.page_size",
        reason: "must be at least 1".to_string(),
      }));
    }
    if let Err(e) = Url::parse(&self.data_service.base_url) {
      return Err(err_with_loc!(ConfigError::InvalidValue {
        field:  "data_service.base_url",
        reason: format!("{:?} is not a url: {}", self.data_service.base_url, e),
      }));
    }
    Ok(())
  }
}

pub fn load_config(path: impl AsRef<Path>) -> crate::Result<Config> {
  let path = path.as_ref();
  let config_str = std::fs::read_to_string(path)
    .map_err(|e| err_with_loc!(ConfigError::OpenFileError(format!("{}: {}", path.display(), e))))?;
  Config::from_toml(&config_str)
}
