use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to open config file: {0}")]
  OpenFileError(String),

  #[error("Failed to parse config file: {0}")]
  ParseError(String),

  #[error("Invalid config value for {field}: {reason}")]
  InvalidValue { field: &'static str, reason: String },
}
