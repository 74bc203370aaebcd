//! Trained candidate models and their evaluation metrics.

use super::{ModelFamily, RunId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One realized hyperparameter assignment (ordered so that serialized
/// candidates are byte-stable across runs).
pub type HyperParams = BTreeMap<String, String>;

/// A sweep grid: parameter name to the values to try.
pub type HyperGrid = BTreeMap<String, Vec<String>>;

/// Evaluation metrics of one candidate, all on the held-out split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
  pub accuracy: f64,
  pub precision: f64,
  pub recall: f64,
  pub f1: f64,
  pub auc: f64,
}

impl MetricBundle {
  /// True when every metric lies in [0, 1]. Candidates outside this range
  /// are rejected as training failures before they reach the metric store.
  pub fn in_range(&self) -> bool {
    [
      self.accuracy,
      self.precision,
      self.recall,
      self.f1,
      self.auc,
    ]
    .iter()
    .all(|m| (0.0..=1.0).contains(m))
  }
}

/// A trained, evaluated model for one family within one run. Immutable once
/// appended to the metric store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingCandidate {
  pub family: ModelFamily,
  pub run_id: RunId,
  /// Best-of-grid hyperparameters realized by the sweep.
  pub hyperparams: HyperParams,
  /// Where the trained artifact was written (passed by reference, never by
  /// value, between pipeline stages).
  pub artifact_uri: String,
  pub metrics: MetricBundle,
}
