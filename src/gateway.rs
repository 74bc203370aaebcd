//! Trigger/status gateway: the external-facing face of the orchestrator.

use crate::error::UnknownRun;
use crate::orchestrator::{Orchestrator, RunConfig};
use crate::types::{PipelineRun, RunId};
use std::sync::Arc;

/// Forwards training triggers and status queries to the orchestrator.
/// Deliberately thin: no force-abort, no mid-task cancellation.
pub struct Gateway {
  orchestrator: Arc<Orchestrator>,
}

impl Gateway {
  pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
    Gateway { orchestrator }
  }

  /// Starts a pipeline run with the default configuration.
  pub fn trigger_training(&self) -> RunId {
    self.orchestrator.trigger(RunConfig::default())
  }

  /// Snapshot of a run's task and run state. `UnknownRun` if the id was
  /// never issued by this orchestrator.
  pub fn training_status(&self, run_id: RunId) -> Result<PipelineRun, UnknownRun> {
    self.orchestrator.status(run_id)
  }
}
