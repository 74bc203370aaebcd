//! Tests for `metric_store`.

use crate::metric_store::MetricStore;
use crate::types::{MetricBundle, ModelFamily, RunId, TrainingCandidate};

pub(crate) fn candidate(run_id: RunId, family: ModelFamily, accuracy: f64) -> TrainingCandidate {
  candidate_with_f1(run_id, family, accuracy, accuracy - 0.03)
}

pub(crate) fn candidate_with_f1(
  run_id: RunId,
  family: ModelFamily,
  accuracy: f64,
  f1: f64,
) -> TrainingCandidate {
  TrainingCandidate {
    family,
    run_id,
    hyperparams: Default::default(),
    artifact_uri: format!("artifacts/{run_id}/{family}.json"),
    metrics: MetricBundle {
      accuracy,
      precision: 0.7,
      recall: 0.6,
      f1,
      auc: 0.8,
    },
  }
}

#[test]
fn append_keeps_insertion_order_per_run() {
  let store = MetricStore::new();
  let run = RunId::new();
  store.append(candidate(run, ModelFamily::Xgboost, 0.83));
  store.append(candidate(run, ModelFamily::Lightgbm, 0.85));

  let candidates = store.candidates_for(run);
  assert_eq!(candidates.len(), 2);
  assert_eq!(candidates[0].family, ModelFamily::Xgboost);
  assert_eq!(candidates[1].family, ModelFamily::Lightgbm);
}

#[test]
fn runs_are_isolated() {
  let store = MetricStore::new();
  let a = RunId::new();
  let b = RunId::new();
  store.append(candidate(a, ModelFamily::RandomForest, 0.8));
  assert_eq!(store.candidates_for(a).len(), 1);
  assert!(store.candidates_for(b).is_empty());
}

#[test]
fn unknown_run_yields_empty() {
  let store = MetricStore::new();
  assert!(store.candidates_for(RunId::new()).is_empty());
}
