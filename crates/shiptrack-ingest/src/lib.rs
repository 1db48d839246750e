//! Periodic ingestion of vessel positions.
//!
//! A [`Scheduler`] owns one background worker that, once per cycle, lists the
//! tracked vessels, asks the [`TrackingSource`] where they are, and writes the
//! decoded reports into a fresh [`VesselStore`] connection. Start and stop go
//! through a shared [`RunControl`].
//!
//! [`TrackingSource`]: shiptrack_core::source::TrackingSource
//! [`VesselStore`]: shiptrack_core::store::VesselStore

mod control;
mod cycle;
mod scheduler;

pub mod error;

pub use control::{Phase, RunControl};
pub use cycle::{CycleOutcome, CycleReport, run_cycle};
pub use error::{BoxError, Error, Result};
pub use scheduler::{IngestConfig, RunOutcome, Scheduler};
