//! Error type for `shiptrack-ingest`.

use thiserror::Error;

/// An error from a collaborator, erased at the trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("could not open the vessel store: {0}")]
  Connect(#[source] BoxError),

  #[error("could not list tracked vessels: {0}")]
  ListVessels(#[source] BoxError),

  #[error("there are no vessels in the database")]
  NoVessels,

  #[error("location request failed: {0}")]
  Api(#[source] BoxError),

  #[error("unusable location response: {0}")]
  Response(#[from] shiptrack_json::Error),

  #[error("failed to store vessel {mmsi}: {source}")]
  StoreVessel {
    mmsi:   i64,
    #[source]
    source: BoxError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
