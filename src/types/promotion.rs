//! The champion/challenger promotion record.

use super::ModelFamily;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to one promoted model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRef {
  pub family: ModelFamily,
  pub version: String,
  pub artifact_uri: String,
  pub accuracy: f64,
}

/// The promotion decision: which artifact serves as champion and which as
/// challenger (fallback). Exactly one record is current at a time; it is
/// replaced whole, never field by field, so readers always see a champion and
/// challenger from the same promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecord {
  /// Champion artifact URI (duplicate of `champion.artifact_uri`, kept at the
  /// top level for consumers that only need the serving pointers).
  pub model_uri: String,
  /// Challenger artifact URI, served only if the champion fails to load.
  pub fallback_model_uri: String,
  /// Champion accuracy at promotion time.
  pub accuracy: f64,
  /// Version of the promoted champion.
  pub version: String,
  pub champion: ModelRef,
  pub challenger: ModelRef,
  pub written_at: DateTime<Utc>,
}

impl PromotionRecord {
  /// Builds a record from a champion/challenger pair. The flat serving
  /// pointers are derived here so the record can never carry a champion URI
  /// from one promotion and a challenger URI from another.
  pub fn new(champion: ModelRef, challenger: ModelRef) -> Self {
    PromotionRecord {
      model_uri: champion.artifact_uri.clone(),
      fallback_model_uri: challenger.artifact_uri.clone(),
      accuracy: champion.accuracy,
      version: champion.version.clone(),
      champion,
      challenger,
      written_at: Utc::now(),
    }
  }
}
