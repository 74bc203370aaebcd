//! The fixed set of model families trained by the pipeline.

use serde::{Deserialize, Serialize};

/// A model family trained by the pipeline. The set is fixed: one training
/// stage per family, all joined at selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelFamily {
  #[serde(rename = "logistic_regression")]
  LogisticRegression,
  #[serde(rename = "random_forest")]
  RandomForest,
  #[serde(rename = "xgboost")]
  Xgboost,
  #[serde(rename = "lightgbm")]
  Lightgbm,
}

impl ModelFamily {
  /// All families, in training-stage order.
  pub const ALL: [ModelFamily; 4] = [
    ModelFamily::LogisticRegression,
    ModelFamily::RandomForest,
    ModelFamily::Xgboost,
    ModelFamily::Lightgbm,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ModelFamily::LogisticRegression => "logistic_regression",
      ModelFamily::RandomForest => "random_forest",
      ModelFamily::Xgboost => "xgboost",
      ModelFamily::Lightgbm => "lightgbm",
    }
  }
}

impl std::fmt::Display for ModelFamily {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
