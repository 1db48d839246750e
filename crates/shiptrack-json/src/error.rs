//! Error types for the tracking response decoder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("response is not a JSON object")]
  InvalidDocument,

  #[error("response has no `result` field")]
  MissingResult,

  /// The service answered but refused the query.
  #[error("query rejected: {}", .description.as_deref().unwrap_or("no description"))]
  Rejected { description: Option<String> },

  #[error("response has no `found` field")]
  MissingFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
