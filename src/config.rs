//! Application configuration (JSON file with defaults).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Process-wide configuration for the serving binary. Every field has a
/// default, so a missing or partial file still yields a usable config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub api_host: String,
  pub api_port: u16,
  /// Root for raw/processed datasets.
  pub data_dir: PathBuf,
  /// Root for trained model artifacts.
  pub artifact_dir: PathBuf,
  /// Location of the persisted promotion record.
  pub promotion_path: PathBuf,
  /// Seed CSV used by the local dataset source.
  pub seed_data_path: PathBuf,
  /// Total attempts per pipeline task.
  pub max_task_attempts: u32,
  pub retry_base_delay_ms: u64,
  pub retry_max_delay_ms: u64,
  pub task_timeout_secs: u64,
}

impl Default for AppConfig {
  fn default() -> Self {
    AppConfig {
      api_host: "127.0.0.1".to_string(),
      api_port: 8000,
      data_dir: PathBuf::from("data"),
      artifact_dir: PathBuf::from("artifacts"),
      promotion_path: PathBuf::from("configs/promotion.json"),
      seed_data_path: PathBuf::from("data/seed/telco-customer-churn.csv"),
      max_task_attempts: 3,
      retry_base_delay_ms: 500,
      retry_max_delay_ms: 30_000,
      task_timeout_secs: 600,
    }
  }
}

impl AppConfig {
  /// Loads the config from `path`, falling back to defaults when the file
  /// does not exist.
  pub fn load_or_default(path: &Path) -> Result<AppConfig, std::io::Error> {
    if !path.exists() {
      info!(path = %path.display(), "no config file, using defaults");
      return Ok(AppConfig::default());
    }
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.api_host, self.api_port)
  }

  pub fn retry_policy(&self) -> crate::orchestrator::RetryPolicy {
    crate::orchestrator::RetryPolicy {
      max_attempts: self.max_task_attempts,
      base_delay: std::time::Duration::from_millis(self.retry_base_delay_ms),
      max_delay: std::time::Duration::from_millis(self.retry_max_delay_ms),
    }
  }
}
