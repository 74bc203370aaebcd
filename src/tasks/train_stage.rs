//! One family's train-and-evaluate unit of work.

use crate::artifact::write_artifact;
use crate::error::PipelineError;
use crate::metric_store::MetricStore;
use crate::trainer::TrainBackend;
use crate::types::{HyperGrid, ModelFamily, RunId, TrainingCandidate};
use std::path::Path;
use tracing::{info, instrument};

/// Runs the sweep for one family, validates the realized metrics, persists
/// the artifact under `artifact_dir/<run_id>/`, and records the candidate in
/// the metric store before returning it.
///
/// Fails with a retryable `TrainingFailure` when the backend errors or
/// produces a metric outside [0, 1].
#[instrument(level = "trace", skip(backend, store, dataset, grid, artifact_dir))]
pub async fn run_training_stage(
  backend: &dyn TrainBackend,
  store: &MetricStore,
  family: ModelFamily,
  run_id: RunId,
  dataset: &Path,
  grid: &HyperGrid,
  artifact_dir: &Path,
) -> Result<TrainingCandidate, PipelineError> {
  let mut outcome = backend.best_of_grid(family, dataset, grid).await?;

  if !outcome.metrics.in_range() {
    return Err(PipelineError::TrainingFailure {
      family,
      reason: format!("metric outside [0,1]: {:?}", outcome.metrics),
    });
  }

  outcome.artifact.version = run_id.to_string();
  let run_dir = artifact_dir.join(run_id.to_string());
  let artifact_uri = write_artifact(&run_dir, &outcome.artifact)?;

  let candidate = TrainingCandidate {
    family,
    run_id,
    hyperparams: outcome.best_params,
    artifact_uri,
    metrics: outcome.metrics,
  };
  store.append(candidate.clone());
  info!(
    family = %family,
    run_id = %run_id,
    accuracy = candidate.metrics.accuracy,
    f1 = candidate.metrics.f1,
    "training stage complete"
  );
  Ok(candidate)
}
