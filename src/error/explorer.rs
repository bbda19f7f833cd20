use thiserror::Error;

use super::DataServiceError;

/// Message shown to the user for any failed fetch, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch network data";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input format";

/// Failures surfaced by the expansion controller.
///
/// Precondition failures (exhausted cursor, already expanded edge, request
/// already in flight) are not errors; they come back as
/// [`crate::model::ExpansionOutcome::Rejected`].
#[derive(Error, Debug)]
pub enum ExplorerError {
  #[error("Invalid input format: {0:?} is neither a transaction signature nor an account address")]
  InvalidInputFormat(String),
  #[error("Failed to fetch network data: {0}")]
  FetchFailed(#[from] DataServiceError),
}

impl ExplorerError {
  pub fn user_message(&self) -> &'static str {
    match self {
      ExplorerError::InvalidInputFormat(_) => INVALID_INPUT_MESSAGE,
      ExplorerError::FetchFailed(_) => FETCH_FAILED_MESSAGE,
    }
  }

  /// Retrying a failed fetch is safe because nothing was merged.
  pub fn is_retryable(&self) -> bool {
    match self {
      ExplorerError::FetchFailed(e) => e.is_retryable(),
      _ => false,
    }
  }
}
