//! Append-only store of evaluated training candidates, keyed by run id.

use crate::types::{RunId, TrainingCandidate};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Records per-candidate evaluation metrics for each run. Append-only:
/// candidates are never mutated or removed once written, so a stored
/// candidate can be shared freely by reference holders.
#[derive(Debug, Default)]
pub struct MetricStore {
  runs: Mutex<HashMap<RunId, Vec<TrainingCandidate>>>,
}

impl MetricStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends one candidate under its run id.
  pub fn append(&self, candidate: TrainingCandidate) {
    debug!(
      run_id = %candidate.run_id,
      family = %candidate.family,
      accuracy = candidate.metrics.accuracy,
      "recording candidate"
    );
    let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
    runs.entry(candidate.run_id).or_default().push(candidate);
  }

  /// All candidates recorded for a run, in append order.
  pub fn candidates_for(&self, run_id: RunId) -> Vec<TrainingCandidate> {
    let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
    runs.get(&run_id).cloned().unwrap_or_default()
  }
}
