use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataServiceError {
  #[error("[DataService] Request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("[DataService] Server returned {status}: {detail}")]
  Server { status: u16, detail: String },
  #[error("[DataService] Invalid payload: {0}")]
  InvalidPayload(String),
  #[error("[DataService] Invalid url: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

impl DataServiceError {
  /// Rate limits, server-side failures, timeouts and refused connections are
  /// worth another attempt; everything else will fail the same way again.
  pub fn is_retryable(&self) -> bool {
    match self {
      DataServiceError::Transport(e) => e.is_timeout() || e.is_connect(),
      DataServiceError::Server { status, .. } => *status == 429 || *status >= 500,
      DataServiceError::InvalidPayload(_) | DataServiceError::InvalidUrl(_) => false,
    }
  }
}
