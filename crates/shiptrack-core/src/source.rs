//! The `TrackingSource` trait, where position reports come from.

use std::future::Future;

/// A remote tracking service queried by vessel identifier.
///
/// Implementations return the raw response body; decoding is left to
/// `shiptrack-json` because the payload's field types are not reliable.
pub trait TrackingSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the latest locations of `ids` as a raw JSON document.
  fn fetch_locations<'a>(
    &'a self,
    ids: &'a [i64],
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
