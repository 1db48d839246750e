//! One ingestion cycle: list, fetch, decode, store.

use shiptrack_core::{
  ShipReport,
  source::TrackingSource,
  store::{StoreConnector, VesselStore},
};
use shiptrack_json::Batch;
use tracing::{debug, error, info, warn};

use crate::{Error, Result, scheduler::IngestConfig};

/// Counters for a cycle that ran to the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
  /// Tracked vessels listed from the store.
  pub vessels:        usize,
  /// Location requests sent.
  pub batches:        usize,
  /// Requests whose response could not be used.
  pub failed_batches: usize,
  /// Sum of the `found` counts of usable responses.
  pub found:          usize,
  /// Entries written to the store.
  pub stored:         usize,
  /// Entries the store rejected.
  pub failed:         usize,
  /// Entries whose MMSI is not tracked; nothing was written for them.
  pub untracked:      usize,
}

/// How a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
  Completed(CycleReport),
  /// Nothing was stored; the next cycle runs as scheduled.
  Skipped(Error),
  /// The store could not be opened; the run must halt.
  Fatal(Error),
}

impl CycleOutcome {
  pub fn is_fatal(&self) -> bool { matches!(self, Self::Fatal(_)) }
}

/// Run a single cycle against a fresh store connection.
///
/// Only a failed connect is fatal. A failed batch is logged and the remaining
/// batches still run; a failed entry is logged and the remaining entries
/// still run.
pub async fn run_cycle<C, A>(connector: &C, source: &A, config: &IngestConfig) -> CycleOutcome
where
  C: StoreConnector,
  A: TrackingSource,
{
  let store = match connector.connect().await {
    Ok(store) => store,
    Err(e) => return CycleOutcome::Fatal(Error::Connect(Box::new(e))),
  };

  let ids = match store.list_vessel_ids().await {
    Ok(ids) if ids.is_empty() => return skipped(Error::NoVessels),
    Ok(ids) => ids,
    Err(e) => return skipped(Error::ListVessels(Box::new(e))),
  };

  let mut report = CycleReport { vessels: ids.len(), ..CycleReport::default() };
  let mut last_error = None;

  for chunk in ids.chunks(config.max_batch.max(1)) {
    report.batches += 1;
    if let Err(e) = ingest_batch(&store, source, chunk, config.retention_cap, &mut report).await {
      warn!(error = %e, size = chunk.len(), "skipping batch");
      report.failed_batches += 1;
      last_error = Some(e);
    }
  }

  if report.failed_batches == report.batches
    && let Some(e) = last_error
  {
    return CycleOutcome::Skipped(e);
  }

  info!(
    vessels = report.vessels,
    batches = report.batches,
    failed_batches = report.failed_batches,
    found = report.found,
    stored = report.stored,
    failed = report.failed,
    untracked = report.untracked,
    "cycle complete"
  );
  CycleOutcome::Completed(report)
}

fn skipped(e: Error) -> CycleOutcome {
  warn!(error = %e, "skipping cycle");
  CycleOutcome::Skipped(e)
}

async fn ingest_batch<S, A>(
  store: &S,
  source: &A,
  ids: &[i64],
  cap: usize,
  report: &mut CycleReport,
) -> Result<()>
where
  S: VesselStore,
  A: TrackingSource,
{
  let body = source
    .fetch_locations(ids)
    .await
    .map_err(|e| Error::Api(Box::new(e)))?;
  let batch = Batch::parse(&body)?;

  if batch.len() != batch.found() {
    warn!(found = batch.found(), entries = batch.len(), "found count does not match entries");
  }
  report.found += batch.found();

  for (index, entry) in batch.reports().enumerate() {
    log_route(&entry);
    match store_report(store, &entry, cap).await {
      Ok(Some(evicted)) => {
        debug!(index, mmsi = entry.vessel.mmsi, evicted, "stored vessel");
        report.stored += 1;
      }
      Ok(None) => {
        warn!(index, mmsi = entry.vessel.mmsi, "ignoring report for untracked vessel");
        report.untracked += 1;
      }
      Err(e) => {
        error!(index, error = %e, "failed to store vessel");
        report.failed += 1;
      }
    }
  }
  Ok(())
}

/// Update the vessel, append its fix and trim its history, stopping at the
/// first failure.
///
/// `None` when the MMSI is not tracked; its fix is dropped.
async fn store_report<S: VesselStore>(
  store: &S,
  report: &ShipReport,
  cap: usize,
) -> Result<Option<usize>> {
  let mmsi = report.vessel.mmsi;
  let imo = report.vessel.imo;
  let wrap = |e: S::Error| Error::StoreVessel { mmsi, source: Box::new(e) };

  if !store.upsert_vessel(&report.vessel).await.map_err(wrap)? {
    return Ok(None);
  }
  store.append_position(imo, report.fix).await.map_err(wrap)?;
  store.enforce_retention(imo, cap).await.map_err(wrap).map(Some)
}

fn log_route(report: &ShipReport) {
  match &report.route {
    Some(route) => debug!(
      mmsi = report.vessel.mmsi,
      departure = route.departure.as_deref().unwrap_or_default(),
      destination = route.destination.as_deref().unwrap_or_default(),
      "route"
    ),
    None => debug!(
      mmsi = report.vessel.mmsi,
      comment = %report.vessel.comment,
      "no route in comment"
    ),
  }
}
