//! Tests for `pipeline_run`.

use super::model_family::ModelFamily;
use super::pipeline_run::{PipelineRun, RunId, RunState, TaskId, TaskState};

#[test]
fn new_run_has_seven_pending_tasks() {
  let run = PipelineRun::new(RunId::new());
  assert_eq!(run.tasks.len(), 7);
  assert!(run.tasks.iter().all(|t| t.state == TaskState::Pending));
  assert_eq!(run.state, RunState::Running);
  assert!(run.current_task.is_none());
  assert!(run.finished_at.is_none());
}

#[test]
fn task_graph_order_is_ingest_preprocess_trains_select() {
  let run = PipelineRun::new(RunId::new());
  assert_eq!(run.tasks[0].task, TaskId::Ingest);
  assert_eq!(run.tasks[1].task, TaskId::Preprocess);
  for (i, family) in ModelFamily::ALL.iter().enumerate() {
    assert_eq!(run.tasks[2 + i].task, TaskId::Train(*family));
  }
  assert_eq!(run.tasks[6].task, TaskId::SelectAndPromote);
}

#[test]
fn task_mut_finds_train_tasks_by_family() {
  let mut run = PipelineRun::new(RunId::new());
  let record = run.task_mut(TaskId::Train(ModelFamily::Xgboost)).unwrap();
  record.state = TaskState::Running;
  assert_eq!(
    run.task(TaskId::Train(ModelFamily::Xgboost)).unwrap().state,
    TaskState::Running
  );
  assert_eq!(
    run.task(TaskId::Train(ModelFamily::Lightgbm)).unwrap().state,
    TaskState::Pending
  );
}

#[test]
fn terminal_only_for_succeeded_or_failed() {
  let mut run = PipelineRun::new(RunId::new());
  assert!(!run.is_terminal());
  run.state = RunState::Failed;
  assert!(run.is_terminal());
  run.state = RunState::Succeeded;
  assert!(run.is_terminal());
}

#[test]
fn task_names_are_stable() {
  assert_eq!(TaskId::Ingest.name(), "ingest");
  assert_eq!(TaskId::Train(ModelFamily::Lightgbm).name(), "train_lightgbm");
  assert_eq!(TaskId::SelectAndPromote.name(), "select_and_promote");
}

#[test]
fn run_id_parses_its_display_form() {
  let id = RunId::new();
  let parsed: RunId = id.to_string().parse().unwrap();
  assert_eq!(parsed, id);
}
