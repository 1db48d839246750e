//! The background worker and the handle that drives it.

use std::{sync::Arc, time::Duration};

use shiptrack_core::{
  source::TrackingSource,
  store::{DEFAULT_RETENTION_CAP, StoreConnector},
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
  control::{Phase, RunControl},
  cycle::{CycleOutcome, run_cycle},
};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Timing and sizing of the ingestion loop.
#[derive(Debug, Clone)]
pub struct IngestConfig {
  /// Sleep between run-flag checks.
  pub tick:          Duration,
  /// Ticks between two cycles.
  pub cycle_ticks:   u32,
  /// Most vessel identifiers sent in one location request.
  pub max_batch:     usize,
  /// Most position samples kept per IMO.
  pub retention_cap: usize,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self {
      tick:          Duration::from_secs(1),
      cycle_ticks:   7200,
      max_batch:     20,
      retention_cap: DEFAULT_RETENTION_CAP,
    }
  }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// How a worker's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  /// [`Scheduler::stop`] was called.
  Stopped,
  /// A cycle could not open the store.
  Halted,
}

struct Inner<C, A> {
  connector: C,
  source:    A,
  config:    IngestConfig,
}

/// Runs ingestion cycles on a fixed schedule in a single tokio task.
///
/// Cloning yields another handle to the same worker.
pub struct Scheduler<C, A> {
  inner:   Arc<Inner<C, A>>,
  control: RunControl,
}

impl<C, A> Clone for Scheduler<C, A> {
  fn clone(&self) -> Self {
    Self { inner: Arc::clone(&self.inner), control: self.control.clone() }
  }
}

impl<C, A> Scheduler<C, A>
where
  C: StoreConnector + 'static,
  A: TrackingSource + 'static,
{
  pub fn new(connector: C, source: A, config: IngestConfig) -> Self {
    Self {
      inner:   Arc::new(Inner { connector, source, config }),
      control: RunControl::new(),
    }
  }

  pub fn config(&self) -> &IngestConfig { &self.inner.config }

  /// Begin a run. The first cycle starts immediately.
  ///
  /// Returns the worker's handle only when a new worker was spawned; a worker
  /// that is still alive is re-armed and `None` is returned.
  pub fn start(&self) -> Option<JoinHandle<RunOutcome>> {
    if !self.control.arm() {
      return None;
    }
    let inner = Arc::clone(&self.inner);
    let control = self.control.clone();
    Some(tokio::spawn(async move { inner.run(control).await }))
  }

  /// Ask the worker to exit at its next tick boundary.
  pub fn stop(&self) { self.control.stop() }

  pub fn is_running(&self) -> bool { self.control.is_running() }

  pub fn phase(&self) -> Phase { self.control.phase() }

  pub fn is_halted(&self) -> bool { self.control.is_halted() }

  /// Run exactly one cycle on the caller's task, outside the schedule.
  pub async fn run_once(&self) -> CycleOutcome {
    run_cycle(&self.inner.connector, &self.inner.source, &self.inner.config).await
  }
}

impl<C, A> Inner<C, A>
where
  C: StoreConnector,
  A: TrackingSource,
{
  async fn run(&self, control: RunControl) -> RunOutcome {
    let cycle_ticks = self.config.cycle_ticks.max(1);
    let mut slept = cycle_ticks;
    let mut outcome = RunOutcome::Stopped;

    info!(
      tick_ms = self.config.tick.as_millis() as u64,
      cycle_ticks,
      "ingestion started"
    );

    while control.keep_going() {
      if slept >= cycle_ticks {
        slept = 0;
        outcome = match run_cycle(&self.connector, &self.source, &self.config).await {
          CycleOutcome::Fatal(e) => {
            error!(error = %e, "halting ingestion");
            control.halt();
            RunOutcome::Halted
          }
          _ => RunOutcome::Stopped,
        };
      } else {
        tokio::time::sleep(self.config.tick).await;
        slept = slept.saturating_add(1);
      }
    }

    info!(?outcome, "ingestion stopped");
    outcome
  }
}
