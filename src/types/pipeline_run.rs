//! One execution instance of the ingest → train → promote task graph.

use super::ModelFamily;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one pipeline run. Every trigger allocates a fresh one, so
/// concurrent runs never share task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
  pub fn new() -> Self {
    RunId(Uuid::new_v4())
  }
}

impl Default for RunId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for RunId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl std::str::FromStr for RunId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(RunId(Uuid::parse_str(s)?))
  }
}

/// A task in the fixed pipeline graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
  Ingest,
  Preprocess,
  Train(ModelFamily),
  SelectAndPromote,
}

impl TaskId {
  pub fn name(&self) -> String {
    match self {
      TaskId::Ingest => "ingest".to_string(),
      TaskId::Preprocess => "preprocess".to_string(),
      TaskId::Train(family) => format!("train_{family}"),
      TaskId::SelectAndPromote => "select_and_promote".to_string(),
    }
  }
}

impl std::fmt::Display for TaskId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.name())
  }
}

/// Lifecycle of one task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
  Pending,
  Running,
  Succeeded,
  Failed,
  Retrying,
}

/// Overall state of a run. Terminal once `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
  Running,
  Succeeded,
  Failed,
}

/// Per-task bookkeeping inside a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
  pub task: TaskId,
  pub state: TaskState,
  /// Attempts made so far (0 until the task first runs).
  pub attempts: u32,
  pub error: Option<String>,
}

impl TaskRecord {
  fn pending(task: TaskId) -> Self {
    TaskRecord {
      task,
      state: TaskState::Pending,
      attempts: 0,
      error: None,
    }
  }
}

/// Snapshot of one pipeline run: task states in graph order plus run-level
/// status and timestamps. Owned and mutated exclusively by the orchestrator;
/// status queries receive clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
  pub id: RunId,
  pub state: RunState,
  pub tasks: Vec<TaskRecord>,
  /// Task currently executing (or the last one that ran).
  pub current_task: Option<TaskId>,
  pub started_at: DateTime<Utc>,
  pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
  /// Creates a fresh run with every task of the fixed graph in PENDING state.
  pub fn new(id: RunId) -> Self {
    let mut tasks = vec![
      TaskRecord::pending(TaskId::Ingest),
      TaskRecord::pending(TaskId::Preprocess),
    ];
    for family in ModelFamily::ALL {
      tasks.push(TaskRecord::pending(TaskId::Train(family)));
    }
    tasks.push(TaskRecord::pending(TaskId::SelectAndPromote));
    PipelineRun {
      id,
      state: RunState::Running,
      tasks,
      current_task: None,
      started_at: Utc::now(),
      finished_at: None,
    }
  }

  pub fn task(&self, task: TaskId) -> Option<&TaskRecord> {
    self.tasks.iter().find(|t| t.task == task)
  }

  pub fn task_mut(&mut self, task: TaskId) -> Option<&mut TaskRecord> {
    self.tasks.iter_mut().find(|t| t.task == task)
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self.state, RunState::Succeeded | RunState::Failed)
  }
}
