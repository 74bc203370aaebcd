//! Error taxonomy shared across the pipeline and serving sides.
//!
//! Propagation policy: task-level pipeline failures are retried by the
//! orchestrator while [PipelineError::is_retryable] holds; run-level failures
//! surface through status queries. Serving failures degrade (fallback model,
//! stale model) rather than taking the API down.

use crate::types::{ModelFamily, RunId};
use thiserror::Error;

/// Failures raised inside pipeline tasks.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// The external training capability errored, or produced a candidate with
  /// a metric outside [0, 1]. Retried up to the task's retry budget.
  #[error("training failed for {family}: {reason}")]
  TrainingFailure { family: ModelFamily, reason: String },

  /// Fewer than 2 candidates reached selection. Fails the run outright;
  /// there is nothing a retry could change without operator intervention.
  #[error("selection needs at least 2 candidates, got {count}")]
  InsufficientCandidates { count: usize },

  /// A task exceeded its maximum duration. Treated as an ordinary task
  /// failure, eligible for retry.
  #[error("task {task} timed out after {}s", timeout.as_secs())]
  TaskTimeout {
    task: String,
    timeout: std::time::Duration,
  },

  #[error("dataset error: {0}")]
  Dataset(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// Unexpected executor-level failure (e.g. a panicked stage).
  #[error("internal: {0}")]
  Internal(String),
}

impl PipelineError {
  /// Whether the orchestrator may retry the failing task.
  pub fn is_retryable(&self) -> bool {
    !matches!(self, PipelineError::InsufficientCandidates { .. })
  }
}

/// Failures raised by the serving lifecycle.
#[derive(Debug, Error)]
pub enum ServingError {
  /// Both champion and challenger failed to load. The previously active
  /// model, if any, stays active.
  #[error("no servable model: champion {champion} and challenger {challenger} both failed to load")]
  NoServableModel { champion: String, challenger: String },

  /// The persisted promotion record could not be read or parsed.
  #[error("cannot read promotion record: {0}")]
  PromotionRecord(#[source] std::io::Error),
}

/// Status query for a run id that was never issued by this orchestrator.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown run: {0}")]
pub struct UnknownRun(pub RunId);

/// Advisory failure while updating registry alias pointers. Logged by the
/// promotion writer; never fails a promotion.
#[derive(Debug, Error)]
#[error("registry update failed for alias {alias}: {reason}")]
pub struct RegistryUpdateFailure {
  pub alias: String,
  pub reason: String,
}

/// Failure to load a model artifact into memory.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("cannot read artifact {uri}: {source}")]
  Read {
    uri: String,
    #[source]
    source: std::io::Error,
  },

  #[error("artifact {uri} is not a valid model: {reason}")]
  Invalid { uri: String, reason: String },
}
