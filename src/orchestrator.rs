//! Pipeline orchestrator: drives the fixed task graph
//! `ingest → preprocess → {train per family} → select_and_promote`
//! with per-task retry, backoff and timeout, and run-level status.

use crate::error::{PipelineError, UnknownRun};
use crate::metric_store::MetricStore;
use crate::promoter::PromotionWriter;
use crate::tasks::{ingest, preprocess, run_training_stage, select_and_promote, DatasetSource};
use crate::trainer::{default_grid, TrainBackend};
use crate::types::{HyperGrid, ModelFamily, PipelineRun, RunId, RunState, TaskId, TaskState};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// Per-task retry budget and backoff shape.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  /// Total attempts per task, including the first.
  pub max_attempts: u32,
  pub base_delay: Duration,
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    RetryPolicy {
      max_attempts: 3,
      base_delay: Duration::from_millis(500),
      max_delay: Duration::from_secs(30),
    }
  }
}

impl RetryPolicy {
  /// Exponential backoff for the given 1-based attempt, with up to 25%
  /// jitter so parallel stages don't retry in lockstep.
  fn backoff(&self, attempt: u32) -> Duration {
    let exp = self
      .base_delay
      .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
      .min(self.max_delay);
    let jitter_ms = rand::thread_rng().gen_range(0..=exp.as_millis() as u64 / 4);
    exp + Duration::from_millis(jitter_ms)
  }
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
  /// Root for raw and processed data (`<data_dir>/raw`, `<data_dir>/processed`).
  pub data_dir: PathBuf,
  /// Root for trained artifacts, one subdirectory per run.
  pub artifact_dir: PathBuf,
  pub retry: RetryPolicy,
  /// Maximum duration per task attempt; exceeding it is a retryable failure.
  pub task_timeout: Duration,
}

/// Per-run configuration. Defaults to the standard grid for every family.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
  /// Grid overrides; families not present use [default_grid].
  pub grids: HashMap<ModelFamily, HyperGrid>,
}

impl RunConfig {
  fn grid_for(&self, family: ModelFamily) -> HyperGrid {
    self
      .grids
      .get(&family)
      .cloned()
      .unwrap_or_else(|| default_grid(family))
  }
}

/// Owns all pipeline runs. Each trigger allocates an independent
/// [PipelineRun]; concurrent runs share nothing but the append-only metric
/// store and the promotion writer.
pub struct Orchestrator {
  config: OrchestratorConfig,
  source: Arc<dyn DatasetSource>,
  backend: Arc<dyn TrainBackend>,
  store: Arc<MetricStore>,
  writer: Arc<PromotionWriter>,
  /// Run table. Mutated as tasks transition, so `status` reads are as fresh
  /// as the last state change.
  runs: Mutex<HashMap<RunId, PipelineRun>>,
}

impl Orchestrator {
  pub fn new(
    config: OrchestratorConfig,
    source: Arc<dyn DatasetSource>,
    backend: Arc<dyn TrainBackend>,
    store: Arc<MetricStore>,
    writer: Arc<PromotionWriter>,
  ) -> Self {
    Orchestrator {
      config,
      source,
      backend,
      store,
      writer,
      runs: Mutex::new(HashMap::new()),
    }
  }

  pub fn metric_store(&self) -> Arc<MetricStore> {
    self.store.clone()
  }

  /// Starts a new pipeline run and returns its id immediately; the run
  /// executes in the background.
  #[instrument(level = "trace", skip(self, run_config))]
  pub fn trigger(self: &Arc<Self>, run_config: RunConfig) -> RunId {
    let run_id = RunId::new();
    {
      let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
      runs.insert(run_id, PipelineRun::new(run_id));
    }
    info!(run_id = %run_id, "pipeline run triggered");
    let this = self.clone();
    tokio::spawn(async move {
      this.execute_run(run_id, run_config).await;
    });
    run_id
  }

  /// Read-only snapshot of a run, reflecting the latest task transitions.
  pub fn status(&self, run_id: RunId) -> Result<PipelineRun, UnknownRun> {
    let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
    runs.get(&run_id).cloned().ok_or(UnknownRun(run_id))
  }

  fn update_run(&self, run_id: RunId, f: impl FnOnce(&mut PipelineRun)) {
    let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(run) = runs.get_mut(&run_id) {
      f(run);
    }
  }

  fn mark_task(
    &self,
    run_id: RunId,
    task: TaskId,
    state: TaskState,
    attempts: u32,
    err: Option<String>,
  ) {
    self.update_run(run_id, |run| {
      if state == TaskState::Running {
        run.current_task = Some(task);
      }
      if let Some(record) = run.task_mut(task) {
        record.state = state;
        record.attempts = attempts;
        record.error = err;
      }
    });
  }

  fn finish_run(&self, run_id: RunId, state: RunState) {
    self.update_run(run_id, |run| {
      run.state = state;
      run.finished_at = Some(Utc::now());
    });
  }

  /// Runs one task with the configured timeout and retry budget.
  /// `attempt_fn` builds a fresh attempt future each time.
  async fn run_task<T, F, Fut>(
    &self,
    run_id: RunId,
    task: TaskId,
    mut attempt_fn: F,
  ) -> Result<T, PipelineError>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
  {
    let policy = &self.config.retry;
    let mut attempt = 0u32;
    loop {
      attempt += 1;
      self.mark_task(run_id, task, TaskState::Running, attempt, None);
      let outcome = match tokio::time::timeout(self.config.task_timeout, attempt_fn()).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::TaskTimeout {
          task: task.name(),
          timeout: self.config.task_timeout,
        }),
      };
      match outcome {
        Ok(value) => {
          self.mark_task(run_id, task, TaskState::Succeeded, attempt, None);
          return Ok(value);
        }
        Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
          let delay = policy.backoff(attempt);
          warn!(
            run_id = %run_id,
            task = %task,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %e,
            "task failed, retrying"
          );
          self.mark_task(run_id, task, TaskState::Retrying, attempt, Some(e.to_string()));
          tokio::time::sleep(delay).await;
        }
        Err(e) => {
          error!(run_id = %run_id, task = %task, attempt, error = %e, "task failed");
          self.mark_task(run_id, task, TaskState::Failed, attempt, Some(e.to_string()));
          return Err(e);
        }
      }
    }
  }

  async fn execute_run(self: Arc<Self>, run_id: RunId, run_config: RunConfig) {
    match self.clone().drive_tasks(run_id, run_config).await {
      Ok(()) => {
        info!(run_id = %run_id, "pipeline run succeeded");
        self.finish_run(run_id, RunState::Succeeded);
      }
      Err(e) => {
        error!(run_id = %run_id, error = %e, "pipeline run failed");
        self.finish_run(run_id, RunState::Failed);
      }
    }
  }

  async fn drive_tasks(
    self: Arc<Self>,
    run_id: RunId,
    run_config: RunConfig,
  ) -> Result<(), PipelineError> {
    // Stage outputs travel by path, never by value.
    let raw_path = self.config.data_dir.join("raw").join("telco-customer-churn.csv");
    let processed_path = self
      .config
      .data_dir
      .join("processed")
      .join(format!("{run_id}.csv"));

    let raw_path = {
      let source = self.source.clone();
      let dest = raw_path.clone();
      self
        .run_task(run_id, TaskId::Ingest, move || {
          let source = source.clone();
          let dest = dest.clone();
          async move { ingest(source.as_ref(), &dest).await }
        })
        .await?
    };

    {
      let raw = raw_path.clone();
      let out = processed_path.clone();
      self
        .run_task(run_id, TaskId::Preprocess, move || {
          let raw = raw.clone();
          let out = out.clone();
          async move { preprocess(&raw, &out).map(|_| ()) }
        })
        .await?;
    }

    // Training stages run in parallel; select_and_promote is the barrier.
    let mut trains = JoinSet::new();
    for family in ModelFamily::ALL {
      let this = self.clone();
      let dataset = processed_path.clone();
      let grid = run_config.grid_for(family);
      trains.spawn(async move {
        let backend = this.backend.clone();
        let store = this.store.clone();
        let artifact_dir = this.config.artifact_dir.clone();
        let result = this
          .run_task(run_id, TaskId::Train(family), move || {
            let backend = backend.clone();
            let store = store.clone();
            let dataset = dataset.clone();
            let grid = grid.clone();
            let artifact_dir = artifact_dir.clone();
            async move {
              run_training_stage(
                backend.as_ref(),
                store.as_ref(),
                family,
                run_id,
                &dataset,
                &grid,
                &artifact_dir,
              )
              .await
              .map(|_| ())
            }
          })
          .await;
        (family, result)
      });
    }

    let mut first_error: Option<PipelineError> = None;
    while let Some(joined) = trains.join_next().await {
      match joined {
        Ok((_, Ok(()))) => {}
        Ok((family, Err(e))) => {
          if first_error.is_none() {
            first_error = Some(e);
          } else {
            warn!(run_id = %run_id, family = %family, "additional training stage failed");
          }
        }
        Err(join_err) => {
          // A panicked stage fails the run like any exhausted task.
          if first_error.is_none() {
            first_error = Some(PipelineError::Internal(format!(
              "training stage panicked: {join_err}"
            )));
          }
        }
      }
    }
    if let Some(e) = first_error {
      return Err(e);
    }

    {
      let store = self.store.clone();
      let writer = self.writer.clone();
      self
        .run_task(run_id, TaskId::SelectAndPromote, move || {
          let store = store.clone();
          let writer = writer.clone();
          async move {
            select_and_promote(store.as_ref(), writer.as_ref(), run_id)
              .await
              .map(|_| ())
          }
        })
        .await?;
    }

    Ok(())
  }
}
