//! Shared run state between the scheduler's handles and its worker.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where the scheduler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// No worker is alive.
  Idle,
  /// A worker is alive and has been asked to keep going.
  Running,
  /// A worker is alive but will exit at its next tick boundary.
  Stopping,
}

#[derive(Debug, Default)]
struct RunState {
  requested:    bool,
  worker_alive: bool,
  halted:       bool,
}

/// Run flags behind a single mutex.
///
/// The lock is only held to read or flip flags, never across an `.await`.
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
  state: Arc<Mutex<RunState>>,
}

impl RunControl {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, RunState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Ask for a run and clear any previous halt.
  ///
  /// Returns `true` when the caller must spawn a worker. A worker that is
  /// still winding down is re-armed instead.
  pub(crate) fn arm(&self) -> bool {
    let mut state = self.lock();
    state.requested = true;
    state.halted = false;
    if state.worker_alive {
      false
    } else {
      state.worker_alive = true;
      true
    }
  }

  /// Ask the worker to exit at its next tick boundary. Idempotent.
  pub fn stop(&self) { self.lock().requested = false; }

  /// Called by the worker between steps.
  ///
  /// When no run is requested the worker is marked dead under the same lock,
  /// so a concurrent [`arm`](Self::arm) either keeps this worker or spawns a
  /// new one, never neither.
  pub(crate) fn keep_going(&self) -> bool {
    let mut state = self.lock();
    if !state.requested {
      state.worker_alive = false;
    }
    state.requested
  }

  /// Record a fatal error and end the current run.
  pub(crate) fn halt(&self) {
    let mut state = self.lock();
    state.requested = false;
    state.halted = true;
  }

  pub fn is_running(&self) -> bool {
    let state = self.lock();
    state.requested && state.worker_alive
  }

  pub fn phase(&self) -> Phase {
    let state = self.lock();
    match (state.worker_alive, state.requested) {
      (false, _) => Phase::Idle,
      (true, true) => Phase::Running,
      (true, false) => Phase::Stopping,
    }
  }

  /// `true` if the last run ended on a fatal error.
  pub fn is_halted(&self) -> bool { self.lock().halted }
}
