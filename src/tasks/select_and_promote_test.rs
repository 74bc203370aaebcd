//! Tests for `select_and_promote`.

use super::select_and_promote::select_and_promote;
use crate::error::PipelineError;
use crate::metric_store::MetricStore;
use crate::metric_store_test::{candidate, candidate_with_f1};
use crate::promoter::PromotionWriter;
use crate::promotion_io::load_promotion;
use crate::registry::InMemoryRegistry;
use crate::types::{ModelFamily, RunId};
use std::sync::Arc;

fn writer(dir: &std::path::Path) -> PromotionWriter {
  PromotionWriter::new(
    dir.join("promotion.json"),
    Arc::new(InMemoryRegistry::new()),
  )
}

#[tokio::test]
async fn promotes_champion_and_challenger_from_the_ranking() {
  let dir = tempfile::tempdir().unwrap();
  let store = MetricStore::new();
  let run_id = RunId::new();
  store.append(candidate(run_id, ModelFamily::LogisticRegression, 0.78));
  store.append(candidate(run_id, ModelFamily::RandomForest, 0.81));
  store.append(candidate_with_f1(run_id, ModelFamily::Xgboost, 0.83, 0.80));
  store.append(candidate_with_f1(run_id, ModelFamily::Lightgbm, 0.83, 0.82));

  let w = writer(dir.path());
  let record = select_and_promote(&store, &w, run_id).await.unwrap();

  assert_eq!(record.champion.family, ModelFamily::Lightgbm);
  assert_eq!(record.challenger.family, ModelFamily::Xgboost);
  assert_eq!(record.version, run_id.to_string());
  assert_eq!(load_promotion(w.path()).unwrap(), record);
}

#[tokio::test]
async fn fewer_than_two_candidates_fails_without_retry() {
  let dir = tempfile::tempdir().unwrap();
  let store = MetricStore::new();
  let run_id = RunId::new();
  store.append(candidate(run_id, ModelFamily::Xgboost, 0.83));

  let err = select_and_promote(&store, &writer(dir.path()), run_id)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    PipelineError::InsufficientCandidates { count: 1 }
  ));
  assert!(!err.is_retryable());
}

#[tokio::test]
async fn candidates_of_other_runs_are_ignored() {
  let dir = tempfile::tempdir().unwrap();
  let store = MetricStore::new();
  let this_run = RunId::new();
  let other_run = RunId::new();
  store.append(candidate(other_run, ModelFamily::Xgboost, 0.9));
  store.append(candidate(other_run, ModelFamily::Lightgbm, 0.9));
  store.append(candidate(this_run, ModelFamily::RandomForest, 0.7));

  let err = select_and_promote(&store, &writer(dir.path()), this_run)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    PipelineError::InsufficientCandidates { count: 1 }
  ));
}
