//! Serving lifecycle: resolve the promotion record and swap loaded models
//! into the handle.

use crate::artifact::ModelLoader;
use crate::error::ServingError;
use crate::model_handle::{LoadStatus, ModelHandle};
use crate::promotion_io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

/// Reacts to promotion changes and reload requests by loading the promoted
/// artifacts and swapping them into the [ModelHandle].
///
/// `reload` is mutually exclusive with itself; it never blocks concurrent
/// reads of the handle, because the handle is swapped by reference.
pub struct LifecycleManager {
  handle: Arc<ModelHandle>,
  loader: Arc<dyn ModelLoader>,
  promotion_path: PathBuf,
  reload_lock: tokio::sync::Mutex<()>,
}

impl LifecycleManager {
  pub fn new(handle: Arc<ModelHandle>, loader: Arc<dyn ModelLoader>, promotion_path: PathBuf) -> Self {
    LifecycleManager {
      handle,
      loader,
      promotion_path,
      reload_lock: tokio::sync::Mutex::new(()),
    }
  }

  pub fn handle(&self) -> Arc<ModelHandle> {
    self.handle.clone()
  }

  /// Resolves the current promotion record and loads the champion; on
  /// champion load failure, loads the challenger and reports DEGRADED. If
  /// both fail, the previously active model (if any) stays active and
  /// [ServingError::NoServableModel] is returned.
  ///
  /// Startup is this exact operation run against whatever record is
  /// persisted.
  #[instrument(level = "trace", skip(self))]
  pub async fn reload(&self) -> Result<LoadStatus, ServingError> {
    // At most one reload in flight; queued reloads re-resolve the record.
    let _reloading = self.reload_lock.lock().await;

    let record = promotion_io::load_promotion(&self.promotion_path)
      .map_err(ServingError::PromotionRecord)?;

    match self.loader.load(&record.champion).await {
      Ok(model) => {
        self
          .handle
          .swap(Arc::new(model), Some(record.challenger.clone()), LoadStatus::Ok);
        info!(
          family = %record.champion.family,
          version = %record.champion.version,
          "champion active"
        );
        Ok(LoadStatus::Ok)
      }
      Err(champion_err) => {
        warn!(
          family = %record.champion.family,
          error = %champion_err,
          "champion failed to load, trying challenger"
        );
        match self.loader.load(&record.challenger).await {
          Ok(model) => {
            self.handle.swap(Arc::new(model), None, LoadStatus::Degraded);
            warn!(
              family = %record.challenger.family,
              "challenger active, serving degraded"
            );
            Ok(LoadStatus::Degraded)
          }
          Err(challenger_err) => {
            error!(
              champion_error = %champion_err,
              challenger_error = %challenger_err,
              "no servable model; keeping previously active model"
            );
            Err(ServingError::NoServableModel {
              champion: record.champion.artifact_uri.clone(),
              challenger: record.challenger.artifact_uri.clone(),
            })
          }
        }
      }
    }
  }
}

/// Spawns the listener that reloads whenever the promotion writer signals a
/// new record. Reload failures are logged; the task keeps listening. Returns
/// when the writer side is dropped.
pub fn spawn_promotion_listener(
  manager: Arc<LifecycleManager>,
  mut changes: watch::Receiver<u64>,
) -> tokio::task::JoinHandle<()> {
  tokio::spawn(async move {
    while changes.changed().await.is_ok() {
      info!("promotion change signalled, reloading");
      if let Err(e) = manager.reload().await {
        error!(error = %e, "reload after promotion failed");
      }
    }
  })
}
