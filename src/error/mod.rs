pub mod config;
pub mod data_service;
pub mod explorer;
pub mod graph;

pub use anyhow::anyhow;
pub use anyhow::Context;
pub use anyhow::Error;
pub use anyhow::Result;
pub use config::ConfigError;
pub use data_service::DataServiceError;
pub use explorer::ExplorerError;
pub use explorer::FETCH_FAILED_MESSAGE;
pub use graph::GraphError;

// For consistent error handling with location info
#[macro_export]
macro_rules! err_with_loc {
  ($err:expr) => {
    anyhow::anyhow!($err).context(format!("at {}:{}", file!(), line!()))
  };
}
