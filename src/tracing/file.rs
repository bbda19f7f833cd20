use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

use super::filter::CrateLevelFilter;
use super::format::ShabakaFormat;
use crate::config::LoggingConfig;
use crate::err_with_loc;
use crate::error::Context;

/// Keeps the non-blocking writers flushing. Hold it until the engine exits.
#[must_use = "logs stop being written once the guard is dropped"]
pub struct TracingGuard {
  _guards: Vec<WorkerGuard>,
}

pub fn setup_tracing(
  logging_config: &LoggingConfig,
  engine_name: &str,
) -> crate::Result<TracingGuard> {
  let base_logs_dir = logging_config.base_dir();
  let debug_dir = base_logs_dir.join("debug");
  let error_dir = base_logs_dir.join("error");

  for dir in [base_logs_dir, debug_dir.as_path(), error_dir.as_path()] {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create logs directory: {}", dir.display()))?;
  }

  let file_name = format!("{}.log", engine_name);
  let debug_appender = RollingFileAppender::new(Rotation::DAILY, &debug_dir, &file_name);
  let error_appender = RollingFileAppender::new(Rotation::DAILY, &error_dir, &file_name);

  let (non_blocking_debug, debug_guard) = tracing_appender::non_blocking(debug_appender);
  let (non_blocking_error, error_guard) = tracing_appender::non_blocking(error_appender);
  #[allow(unused_mut)]
  let mut guards = vec![debug_guard, error_guard];

  let format = ShabakaFormat {
    engine_name: engine_name.to_string(),
  };

  let subscriber = tracing_subscriber::registry()
    // DEBUG log file
    .with(
      tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .event_format(format.clone())
        .with_writer(non_blocking_debug)
        .with_filter(CrateLevelFilter::debug_only()),
    )
    // ERROR log file - warn and error
    .with(
      tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .event_format(format.clone())
        .with_writer(non_blocking_error)
        .with_filter(CrateLevelFilter::error_warn()),
    );

  #[cfg(feature = "prod")]
  let subscriber = subscriber.with(
    tracing_subscriber::fmt::Layer::default()
      .with_ansi(true)
      .event_format(format.clone())
      .with_writer(std::io::stderr)
      .with_filter(CrateLevelFilter::error_only()),
  );

  #[cfg(feature = "dev")]
  let subscriber = {
    let info_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir, &file_name);
    let (non_blocking_info, info_guard) = tracing_appender::non_blocking(info_appender);
    guards.push(info_guard);
    subscriber
      // Terminal output - info
      .with(
        tracing_subscriber::fmt::Layer::default()
          .with_ansi(true)
          .event_format(format.clone())
          .with_writer(std::io::stderr)
          .with_filter(CrateLevelFilter::info_only()),
      )
      // INFO log file
      .with(
        tracing_subscriber::fmt::Layer::default()
          .with_ansi(false)
          .event_format(format.clone())
          .with_writer(non_blocking_info)
          .with_filter(CrateLevelFilter::info_only()),
      )
  };

  tracing::subscriber::set_global_default(subscriber)
    .map_err(|e| err_with_loc!(format!("error setting up logging: {}", e)))?;

  tracing::info!("{}_logging_started::debug_logs::{}", engine_name, debug_dir.join(&file_name).display());
  tracing::info!("{}_logging_started::error_logs::{}", engine_name, error_dir.join(&file_name).display());

  Ok(TracingGuard { _guards: guards })
}
