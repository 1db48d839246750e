//! Error type for `shiptrack-aprs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("location request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("location request returned {status}")]
  Status { status: reqwest::StatusCode },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
