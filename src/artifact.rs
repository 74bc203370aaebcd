//! Model artifacts: the on-disk format, loading, and inference.
//!
//! An artifact is a JSON file holding linear weights over the preprocessed
//! feature vector plus a bias; scoring is a logistic over the dot product.
//! How the weights were fitted is the training backend's business — the
//! serving side only needs to load and score them.

use crate::error::LoadError;
use crate::types::{ModelFamily, ModelRef, FEATURE_COUNT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Serialized model artifact, as written by a training stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnArtifact {
  pub family: ModelFamily,
  pub version: String,
  /// One weight per feature of the preprocessed schema.
  pub weights: Vec<f64>,
  pub bias: f64,
  pub trained_at: DateTime<Utc>,
}

impl ChurnArtifact {
  fn validate(&self, uri: &str) -> Result<(), LoadError> {
    if self.weights.len() != FEATURE_COUNT {
      return Err(LoadError::Invalid {
        uri: uri.to_string(),
        reason: format!(
          "expected {FEATURE_COUNT} weights, found {}",
          self.weights.len()
        ),
      });
    }
    if self.weights.iter().any(|w| !w.is_finite()) || !self.bias.is_finite() {
      return Err(LoadError::Invalid {
        uri: uri.to_string(),
        reason: "non-finite weight".to_string(),
      });
    }
    Ok(())
  }
}

/// A model loaded into memory and ready for inference. Immutable; swapped
/// whole when a new promotion is loaded.
#[derive(Debug)]
pub struct LoadedModel {
  pub model_ref: ModelRef,
  artifact: ChurnArtifact,
}

impl LoadedModel {
  pub fn new(model_ref: ModelRef, artifact: ChurnArtifact) -> Self {
    LoadedModel {
      model_ref,
      artifact,
    }
  }

  /// Churn decision for one encoded feature vector.
  pub fn predict(&self, features: &[f64]) -> bool {
    self.score(features) >= 0.5
  }

  /// Logistic score in (0, 1).
  pub fn score(&self, features: &[f64]) -> f64 {
    let z: f64 = self
      .artifact
      .weights
      .iter()
      .zip(features)
      .map(|(w, x)| w * x)
      .sum::<f64>()
      + self.artifact.bias;
    1.0 / (1.0 + (-z).exp())
  }
}

/// Resolves a model reference into a loaded model. Seam for tests and for
/// registries that serve artifacts remotely.
#[async_trait]
pub trait ModelLoader: Send + Sync {
  async fn load(&self, model_ref: &ModelRef) -> Result<LoadedModel, LoadError>;
}

/// Loads artifacts from the local filesystem. The artifact URI is a plain
/// path, optionally prefixed with `file:`.
#[derive(Debug, Default)]
pub struct FileLoader;

impl FileLoader {
  pub fn new() -> Self {
    FileLoader
  }
}

#[async_trait]
impl ModelLoader for FileLoader {
  #[instrument(level = "trace", skip(self, model_ref), fields(uri = %model_ref.artifact_uri))]
  async fn load(&self, model_ref: &ModelRef) -> Result<LoadedModel, LoadError> {
    let uri = &model_ref.artifact_uri;
    let path = uri.strip_prefix("file:").unwrap_or(uri);
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
      uri: uri.clone(),
      source,
    })?;
    let artifact: ChurnArtifact =
      serde_json::from_slice(&bytes).map_err(|e| LoadError::Invalid {
        uri: uri.clone(),
        reason: e.to_string(),
      })?;
    artifact.validate(uri)?;
    if artifact.family != model_ref.family {
      return Err(LoadError::Invalid {
        uri: uri.clone(),
        reason: format!(
          "artifact family {} does not match reference {}",
          artifact.family, model_ref.family
        ),
      });
    }
    info!(family = %artifact.family, version = %artifact.version, "artifact loaded");
    Ok(LoadedModel::new(model_ref.clone(), artifact))
  }
}

/// Writes an artifact under `dir` as `{family}.json`; returns the URI.
pub fn write_artifact(
  dir: &std::path::Path,
  artifact: &ChurnArtifact,
) -> Result<String, std::io::Error> {
  std::fs::create_dir_all(dir)?;
  let path = dir.join(format!("{}.json", artifact.family));
  let json = serde_json::to_string_pretty(artifact)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  std::fs::write(&path, json)?;
  Ok(path.to_string_lossy().into_owned())
}
