//! Tests for `trainer`.

use crate::trainer::{default_grid, evaluate, load_dataset, NaiveBackend, TrainBackend};
use crate::types::{ModelFamily, FEATURE_COUNT};
use std::path::PathBuf;

/// Writes a small processed CSV where churners have short tenure and high
/// monthly charges; separable enough for the baseline backend.
pub(crate) fn write_synthetic_dataset(dir: &std::path::Path, rows: usize) -> PathBuf {
  let path = dir.join("processed.csv");
  let mut writer = csv::Writer::from_path(&path).unwrap();
  let mut header: Vec<String> = (0..FEATURE_COUNT).map(|i| format!("f{i}")).collect();
  header.push("Churn".to_string());
  writer.write_record(&header).unwrap();
  for i in 0..rows {
    let churn = i % 2 == 0;
    let tenure = if churn { 2.0 + (i % 5) as f64 } else { 40.0 + (i % 20) as f64 };
    let monthly = if churn { 95.0 + (i % 10) as f64 } else { 30.0 + (i % 10) as f64 };
    let mut row = vec![0.0; FEATURE_COUNT];
    row[3] = tenure;
    row[15] = monthly;
    row[16] = tenure * monthly;
    let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
    record.push(if churn { "1" } else { "0" }.to_string());
    writer.write_record(&record).unwrap();
  }
  writer.flush().unwrap();
  path
}

#[test]
fn default_grids_match_each_family() {
  let lr = default_grid(ModelFamily::LogisticRegression);
  assert_eq!(lr["C"].len(), 5);
  assert_eq!(lr["solver"], vec!["liblinear", "lbfgs"]);

  let lgbm = default_grid(ModelFamily::Lightgbm);
  assert!(lgbm.contains_key("num_leaves"));
  assert_eq!(lgbm["learning_rate"].len(), 3);
}

#[test]
fn load_dataset_reads_features_and_labels() {
  let dir = tempfile::tempdir().unwrap();
  let path = write_synthetic_dataset(dir.path(), 20);
  let data = load_dataset(&path).unwrap();
  assert_eq!(data.len(), 20);
  assert_eq!(data.rows[0].len(), FEATURE_COUNT);
  assert!(data.labels[0]);
  assert!(!data.labels[1]);
}

#[test]
fn load_dataset_rejects_wrong_column_count() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bad.csv");
  std::fs::write(&path, "a,b\n1,2\n").unwrap();
  assert!(load_dataset(&path).is_err());
}

#[test]
fn evaluate_on_perfect_predictions() {
  let scores = [0.9, 0.8, 0.1, 0.2];
  let labels = [true, true, false, false];
  let m = evaluate(&scores, &labels);
  assert_eq!(m.accuracy, 1.0);
  assert_eq!(m.precision, 1.0);
  assert_eq!(m.recall, 1.0);
  assert_eq!(m.f1, 1.0);
  assert_eq!(m.auc, 1.0);
}

#[test]
fn evaluate_handles_degenerate_all_negative() {
  let scores = [0.1, 0.2];
  let labels = [false, false];
  let m = evaluate(&scores, &labels);
  assert_eq!(m.accuracy, 1.0);
  assert_eq!(m.precision, 0.0);
  assert_eq!(m.auc, 0.5);
  assert!(m.in_range());
}

#[tokio::test]
async fn naive_backend_learns_the_separable_dataset() {
  let dir = tempfile::tempdir().unwrap();
  let path = write_synthetic_dataset(dir.path(), 100);
  let backend = NaiveBackend::new();
  let outcome = backend
    .best_of_grid(
      ModelFamily::Lightgbm,
      &path,
      &default_grid(ModelFamily::Lightgbm),
    )
    .await
    .unwrap();
  assert!(outcome.metrics.in_range());
  assert!(outcome.metrics.accuracy > 0.7, "accuracy {}", outcome.metrics.accuracy);
  assert_eq!(outcome.artifact.weights.len(), FEATURE_COUNT);
  assert!(!outcome.best_params.is_empty());
}

#[tokio::test]
async fn naive_backend_is_deterministic() {
  let dir = tempfile::tempdir().unwrap();
  let path = write_synthetic_dataset(dir.path(), 60);
  let backend = NaiveBackend::new();
  let grid = default_grid(ModelFamily::Xgboost);
  let a = backend
    .best_of_grid(ModelFamily::Xgboost, &path, &grid)
    .await
    .unwrap();
  let b = backend
    .best_of_grid(ModelFamily::Xgboost, &path, &grid)
    .await
    .unwrap();
  assert_eq!(a.metrics, b.metrics);
  assert_eq!(a.best_params, b.best_params);
  assert_eq!(a.artifact.weights, b.artifact.weights);
}

#[tokio::test]
async fn tiny_dataset_is_a_training_failure() {
  let dir = tempfile::tempdir().unwrap();
  let path = write_synthetic_dataset(dir.path(), 4);
  let err = NaiveBackend::new()
    .best_of_grid(
      ModelFamily::RandomForest,
      &path,
      &default_grid(ModelFamily::RandomForest),
    )
    .await
    .unwrap_err();
  assert!(err.is_retryable());
}
