//! Concurrency-safe holder of the active inference model.

use crate::artifact::LoadedModel;
use crate::types::ModelRef;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Load status of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
  /// The champion loaded and is active.
  Ok,
  /// The champion failed to load; the challenger is active.
  Degraded,
}

/// One fully-consistent view of the handle: active model, its fallback, and
/// status. Built whole and swapped whole — readers can never see an active
/// model from one promotion paired with the status of another.
#[derive(Debug)]
pub struct HandleState {
  pub active: Arc<LoadedModel>,
  /// The model serving would fall back to if the active one were reloaded
  /// and failed. None when already serving the fallback.
  pub fallback: Option<ModelRef>,
  pub status: LoadStatus,
}

/// Holds the currently loaded inference model. Reads take a cheap lock, clone
/// an `Arc`, and release; in-flight predictions keep their model alive even
/// across a swap. Swapping replaces the whole state reference, so reads are
/// never torn and never block on a reload in progress.
#[derive(Debug, Default)]
pub struct ModelHandle {
  state: RwLock<Option<Arc<HandleState>>>,
}

impl ModelHandle {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of the current state; `None` until the first successful load.
  pub fn current(&self) -> Option<Arc<HandleState>> {
    let state = self.state.read().unwrap_or_else(|e| e.into_inner());
    state.clone()
  }

  /// The active model for inference, if any. Never blocks on reload.
  pub fn current_model(&self) -> Option<Arc<LoadedModel>> {
    self.current().map(|s| s.active.clone())
  }

  /// Atomically replaces the entire state. All-or-nothing: new readers see
  /// the new state, readers holding the old `Arc` finish against the old one.
  pub fn swap(&self, active: Arc<LoadedModel>, fallback: Option<ModelRef>, status: LoadStatus) {
    let next = Arc::new(HandleState {
      active,
      fallback,
      status,
    });
    let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
    *state = Some(next);
  }
}
