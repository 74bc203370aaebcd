//! Promotion writer: persists the champion/challenger selection and signals
//! the serving side.

use crate::promotion_io;
use crate::registry::{ModelRegistry, CHALLENGER_ALIAS, CHAMPION_ALIAS};
use crate::types::{ModelRef, PromotionRecord};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Writes promotion records. Single-writer: concurrent `promote` calls are
/// serialized, and the on-disk record is replaced by rename, so readers never
/// observe a record mixing two promotions.
pub struct PromotionWriter {
  path: PathBuf,
  registry: Arc<dyn ModelRegistry>,
  /// Bumped after every successful write; serving subscribes to this.
  signal: watch::Sender<u64>,
  /// Serializes writers; readers are lock-free (they read the renamed file).
  write_lock: tokio::sync::Mutex<()>,
}

impl PromotionWriter {
  pub fn new(path: PathBuf, registry: Arc<dyn ModelRegistry>) -> Self {
    let (signal, _) = watch::channel(0);
    PromotionWriter {
      path,
      registry,
      signal,
      write_lock: tokio::sync::Mutex::new(()),
    }
  }

  /// Path of the persisted promotion record.
  pub fn path(&self) -> &std::path::Path {
    &self.path
  }

  /// Subscribes to promotion-changed notifications. The receiver observes a
  /// new value after each successful `promote`.
  pub fn subscribe(&self) -> watch::Receiver<u64> {
    self.signal.subscribe()
  }

  /// Persists a new promotion record and signals subscribers. Registry alias
  /// updates are best-effort: a failure there is logged and the promotion
  /// still succeeds.
  #[instrument(level = "trace", skip(self, champion, challenger))]
  pub async fn promote(
    &self,
    champion: ModelRef,
    challenger: ModelRef,
  ) -> Result<PromotionRecord, std::io::Error> {
    let _writer = self.write_lock.lock().await;
    let record = PromotionRecord::new(champion, challenger);
    promotion_io::save_promotion(&self.path, &record)?;
    info!(
      champion = %record.champion.family,
      challenger = %record.challenger.family,
      version = %record.version,
      path = %self.path.display(),
      "promotion record written"
    );

    if let Err(e) = self
      .registry
      .set_alias(CHAMPION_ALIAS, &record.champion)
      .await
    {
      warn!(error = %e, "champion alias update failed (advisory)");
    }
    if let Err(e) = self
      .registry
      .set_alias(CHALLENGER_ALIAS, &record.challenger)
      .await
    {
      warn!(error = %e, "challenger alias update failed (advisory)");
    }

    // Does not block on how (or whether) the serving side reacts.
    self.signal.send_modify(|seq| *seq += 1);
    Ok(record)
  }
}
