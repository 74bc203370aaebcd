//! Promotion record save/load (JSON file).
//!
//! Saving writes a sibling temp file and renames it over the target, so a
//! concurrent reader sees either the fully-old or fully-new record, never a
//! partially written one.

use crate::types::PromotionRecord;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Default filename for the promotion record under a config directory.
pub const PROMOTION_FILENAME: &str = "promotion.json";

fn temp_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Saves a promotion record to `path` as JSON, atomically (temp + rename).
#[instrument(level = "trace", skip(path, record))]
pub fn save_promotion(path: &Path, record: &PromotionRecord) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(record)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  let tmp = temp_path(path);
  std::fs::write(&tmp, json)?;
  std::fs::rename(&tmp, path)
}

/// Loads the promotion record from `path`. Returns error if the file is
/// missing or invalid JSON.
#[instrument(level = "trace", skip(path))]
pub fn load_promotion(path: &Path) -> Result<PromotionRecord, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
