use tracing::Level;
use tracing::Metadata;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::Filter;
use tracing_subscriber::registry::LookupSpan;

// Events of dependencies (reqwest, hyper) never reach the log files
const CRATE_TARGET: &str = "shabaka";

/// Passes events of this crate whose level is one of `levels`.
#[derive(Debug, Clone, Copy)]
pub struct CrateLevelFilter {
  levels: &'static [Level],
}

impl CrateLevelFilter {
  pub const fn debug_only() -> Self {
    Self { levels: &[Level::DEBUG] }
  }

  #[cfg(feature = "dev")]
  pub const fn info_only() -> Self {
    Self { levels: &[Level::INFO] }
  }

  pub const fn error_warn() -> Self {
    Self {
      levels: &[Level::ERROR, Level::WARN],
    }
  }

  pub const fn error_only() -> Self {
    Self { levels: &[Level::ERROR] }
  }

  pub fn accepts(
    &self,
    level: &Level,
    target: &str,
  ) -> bool {
    self.levels.contains(level) && target.starts_with(CRATE_TARGET)
  }
}

impl<S> Filter<S> for CrateLevelFilter
where
  S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
  fn enabled(
    &self,
    meta: &Metadata<'_>,
    _ctx: &Context<'_, S>,
  ) -> bool {
    self.accepts(meta.level(), meta.target())
  }
}
