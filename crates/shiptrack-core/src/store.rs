//! The `VesselStore` trait and its connection factory.
//!
//! The trait is implemented by storage backends (e.g.
//! `shiptrack-store-sqlite`). The scheduler depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::vessel::{PositionFix, PositionSample, Vessel};

/// Default number of position samples kept per vessel.
pub const DEFAULT_RETENTION_CAP: usize = 20;

// ─── Store ───────────────────────────────────────────────────────────────────

/// Storage for current vessel state and bounded position history.
///
/// Vessel rows are keyed by MMSI. Position history is grouped by IMO and is
/// trimmed oldest-first by [`enforce_retention`](Self::enforce_retention).
pub trait VesselStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// MMSIs of every tracked vessel, in registration order.
  fn list_vessel_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// Register `mmsi` for tracking. Does nothing if it is already known.
  ///
  /// Returns `true` if a new row was created.
  fn track_vessel(
    &self,
    mmsi: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite the full attribute set of the tracked vessel whose MMSI
  /// matches `vessel.mmsi`.
  ///
  /// Never creates a row: returns `false` if the MMSI is not tracked. Only
  /// [`track_vessel`](Self::track_vessel) adds vessels.
  fn upsert_vessel<'a>(
    &'a self,
    vessel: &'a Vessel,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Append one position sample to the history of `imo`.
  fn append_position(
    &self,
    imo: i64,
    fix: PositionFix,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the oldest samples of `imo` until at most `cap` remain.
  ///
  /// Returns the number of samples evicted.
  fn enforce_retention(
    &self,
    imo: i64,
    cap: usize,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Retained samples of `imo`, oldest first.
  fn positions(
    &self,
    imo: i64,
  ) -> impl Future<Output = Result<Vec<PositionSample>, Self::Error>> + Send + '_;
}

// ─── Connector ───────────────────────────────────────────────────────────────

/// Opens a fresh [`VesselStore`] connection.
///
/// The scheduler connects once per cycle and drops the store when the cycle
/// ends. A connect failure halts the scheduler.
pub trait StoreConnector: Send + Sync {
  type Store: VesselStore + 'static;
  type Error: std::error::Error + Send + Sync + 'static;

  fn connect(
    &self,
  ) -> impl Future<Output = Result<Self::Store, Self::Error>> + Send + '_;
}
