//! Data ingestion: fetch the raw dataset into the run's data directory.

use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Dataset acquisition seam. The production source downloads from a remote
/// dataset host; tests and single-node setups copy a local seed file.
#[async_trait]
pub trait DatasetSource: Send + Sync {
  /// Places the raw dataset at `dest`. The parent directory exists.
  async fn fetch(&self, dest: &Path) -> Result<(), PipelineError>;
}

/// Copies a local seed CSV into place.
#[derive(Debug)]
pub struct LocalSeedSource {
  seed: PathBuf,
}

impl LocalSeedSource {
  pub fn new(seed: PathBuf) -> Self {
    LocalSeedSource { seed }
  }
}

#[async_trait]
impl DatasetSource for LocalSeedSource {
  async fn fetch(&self, dest: &Path) -> Result<(), PipelineError> {
    tokio::fs::copy(&self.seed, dest).await?;
    Ok(())
  }
}

/// Ingests the raw dataset. Idempotent: when the file already exists at
/// `output_path` the fetch is skipped, so retries and re-triggers never
/// re-download.
#[instrument(level = "trace", skip(source, output_path))]
pub async fn ingest(
  source: &dyn DatasetSource,
  output_path: &Path,
) -> Result<PathBuf, PipelineError> {
  if tokio::fs::try_exists(output_path).await? {
    info!(path = %output_path.display(), "raw data already present, skipping fetch");
    return Ok(output_path.to_path_buf());
  }
  if let Some(parent) = output_path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  source.fetch(output_path).await?;
  info!(path = %output_path.display(), "raw data ingested");
  Ok(output_path.to_path_buf())
}
