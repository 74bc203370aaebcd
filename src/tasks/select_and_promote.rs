//! Final task: rank the run's candidates and write the promotion record.

use crate::error::PipelineError;
use crate::metric_store::MetricStore;
use crate::promoter::PromotionWriter;
use crate::ranker;
use crate::types::{ModelRef, PromotionRecord, RunId, TrainingCandidate};
use tracing::instrument;

fn to_model_ref(candidate: &TrainingCandidate) -> ModelRef {
  ModelRef {
    family: candidate.family,
    version: candidate.run_id.to_string(),
    artifact_uri: candidate.artifact_uri.clone(),
    accuracy: candidate.metrics.accuracy,
  }
}

/// Ranks all candidates recorded for the run and promotes the top two.
/// Fails with `InsufficientCandidates` (not retryable) below 2 candidates.
#[instrument(level = "trace", skip(store, writer))]
pub async fn select_and_promote(
  store: &MetricStore,
  writer: &PromotionWriter,
  run_id: RunId,
) -> Result<PromotionRecord, PipelineError> {
  let candidates = store.candidates_for(run_id);
  let selection = ranker::rank(candidates)?;
  let record = writer
    .promote(
      to_model_ref(&selection.champion),
      to_model_ref(&selection.challenger),
    )
    .await?;
  Ok(record)
}
