//! The external training capability seam and the bundled baseline backend.
//!
//! The pipeline treats training as opaque: "given a family, a dataset and a
//! hyperparameter grid, return the best-of-grid candidate with realized
//! metrics". Real deployments plug a proper gradient-boosting or linear
//! backend in behind [TrainBackend]; the bundled [NaiveBackend] is a
//! class-centroid baseline that keeps the pipeline runnable end to end.

use crate::artifact::ChurnArtifact;
use crate::error::PipelineError;
use crate::types::{HyperGrid, HyperParams, MetricBundle, ModelFamily, FEATURE_COUNT};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, instrument};

/// Result of one family's sweep: the fitted artifact, its held-out metrics,
/// and the winning hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
  pub artifact: ChurnArtifact,
  pub metrics: MetricBundle,
  pub best_params: HyperParams,
}

/// External training capability: hyperparameter sweep with cross-validation,
/// returning the best configuration for the family.
#[async_trait]
pub trait TrainBackend: Send + Sync {
  async fn best_of_grid(
    &self,
    family: ModelFamily,
    dataset: &Path,
    grid: &HyperGrid,
  ) -> Result<TrainOutcome, PipelineError>;
}

/// Default sweep grid per family (mirrors the grids the production sweeps
/// use for each library).
pub fn default_grid(family: ModelFamily) -> HyperGrid {
  let entries: &[(&str, &[&str])] = match family {
    ModelFamily::LogisticRegression => &[
      ("C", &["0.01", "0.1", "1", "10", "100"]),
      ("solver", &["liblinear", "lbfgs"]),
    ],
    ModelFamily::RandomForest => &[
      ("n_estimators", &["50", "100", "200"]),
      ("max_depth", &["none", "10", "20", "30"]),
    ],
    ModelFamily::Xgboost => &[
      ("learning_rate", &["0.01", "0.1", "0.2"]),
      ("n_estimators", &["50", "100", "200"]),
      ("max_depth", &["3", "5", "7"]),
    ],
    ModelFamily::Lightgbm => &[
      ("learning_rate", &["0.01", "0.1", "0.2"]),
      ("n_estimators", &["50", "100", "200"]),
      ("num_leaves", &["31", "50", "100"]),
    ],
  };
  entries
    .iter()
    .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
    .collect()
}

/// A labelled dataset in memory: encoded feature rows plus churn labels.
#[derive(Debug, Clone)]
pub struct Dataset {
  pub rows: Vec<Vec<f64>>,
  pub labels: Vec<bool>,
}

impl Dataset {
  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

/// Loads a processed CSV (feature columns followed by a trailing Churn
/// column) into memory.
pub fn load_dataset(path: &Path) -> Result<Dataset, PipelineError> {
  let mut reader = csv::Reader::from_path(path)?;
  let mut rows = Vec::new();
  let mut labels = Vec::new();
  for result in reader.records() {
    let record = result?;
    if record.len() != FEATURE_COUNT + 1 {
      return Err(PipelineError::Dataset(format!(
        "expected {} columns, found {}",
        FEATURE_COUNT + 1,
        record.len()
      )));
    }
    let mut features = Vec::with_capacity(FEATURE_COUNT);
    for field in record.iter().take(FEATURE_COUNT) {
      features.push(field.parse::<f64>().map_err(|_| {
        PipelineError::Dataset(format!("non-numeric feature value: {field:?}"))
      })?);
    }
    let label = record
      .get(FEATURE_COUNT)
      .map(|v| v.trim() == "1")
      .unwrap_or(false);
    rows.push(features);
    labels.push(label);
  }
  Ok(Dataset { rows, labels })
}

/// Deterministic 80/20 split: every 5th row is held out. Keeps evaluation
/// reproducible without threading a seed through the pipeline.
fn holdout_indices(len: usize) -> (Vec<usize>, Vec<usize>) {
  let (mut train, mut test) = (Vec::new(), Vec::new());
  for i in 0..len {
    if i % 5 == 0 {
      test.push(i);
    } else {
      train.push(i);
    }
  }
  (train, test)
}

/// Computes the full metric bundle from scores and labels at threshold 0.5.
/// AUC is the Mann-Whitney rank statistic over the scores.
pub(crate) fn evaluate(scores: &[f64], labels: &[bool]) -> MetricBundle {
  let (mut tp, mut fp, mut tn, mut fne) = (0u64, 0u64, 0u64, 0u64);
  for (score, &label) in scores.iter().zip(labels) {
    match (*score >= 0.5, label) {
      (true, true) => tp += 1,
      (true, false) => fp += 1,
      (false, false) => tn += 1,
      (false, true) => fne += 1,
    }
  }
  let total = (tp + fp + tn + fne) as f64;
  let accuracy = if total > 0.0 {
    (tp + tn) as f64 / total
  } else {
    0.0
  };
  let precision = if tp + fp > 0 {
    tp as f64 / (tp + fp) as f64
  } else {
    0.0
  };
  let recall = if tp + fne > 0 {
    tp as f64 / (tp + fne) as f64
  } else {
    0.0
  };
  let f1 = if precision + recall > 0.0 {
    2.0 * precision * recall / (precision + recall)
  } else {
    0.0
  };

  // AUC: fraction of (positive, negative) pairs ranked correctly.
  let mut correct = 0.0f64;
  let mut pairs = 0.0f64;
  for (si, &li) in scores.iter().zip(labels) {
    if !li {
      continue;
    }
    for (sj, &lj) in scores.iter().zip(labels) {
      if lj {
        continue;
      }
      pairs += 1.0;
      if si > sj {
        correct += 1.0;
      } else if si == sj {
        correct += 0.5;
      }
    }
  }
  let auc = if pairs > 0.0 { correct / pairs } else { 0.5 };

  MetricBundle {
    accuracy,
    precision,
    recall,
    f1,
    auc,
  }
}

/// Class-centroid baseline backend. Fits linear weights as the difference of
/// per-class feature means (feature-scaled), then sweeps a single shrinkage
/// scale derived from each grid combination and keeps the best holdout F1.
/// Deterministic for a given dataset and grid.
#[derive(Debug, Default)]
pub struct NaiveBackend;

impl NaiveBackend {
  pub fn new() -> Self {
    NaiveBackend
  }

  fn fit(dataset: &Dataset, train: &[usize], scale: f64) -> (Vec<f64>, f64) {
    let dim = FEATURE_COUNT;
    let mut mean_pos = vec![0.0; dim];
    let mut mean_neg = vec![0.0; dim];
    let mut spread = vec![0.0; dim];
    let (mut n_pos, mut n_neg) = (0usize, 0usize);
    for &i in train {
      let row = &dataset.rows[i];
      let acc = if dataset.labels[i] {
        n_pos += 1;
        &mut mean_pos
      } else {
        n_neg += 1;
        &mut mean_neg
      };
      for (a, x) in acc.iter_mut().zip(row) {
        *a += x;
      }
      for (s, x) in spread.iter_mut().zip(row) {
        *s += x.abs();
      }
    }
    if n_pos > 0 {
      mean_pos.iter_mut().for_each(|m| *m /= n_pos as f64);
    }
    if n_neg > 0 {
      mean_neg.iter_mut().for_each(|m| *m /= n_neg as f64);
    }
    let n = train.len().max(1) as f64;
    spread.iter_mut().for_each(|s| *s = (*s / n).max(1e-9));

    let mut weights = vec![0.0; dim];
    let mut bias = 0.0;
    for d in 0..dim {
      let w = scale * (mean_pos[d] - mean_neg[d]) / spread[d];
      weights[d] = w;
      bias -= w * (mean_pos[d] + mean_neg[d]) / 2.0;
    }
    (weights, bias)
  }

  /// Maps one grid combination to a shrinkage scale: the product of its
  /// numeric values, dampened and clamped so extreme grid points stay sane.
  fn combo_scale(params: &HyperParams) -> f64 {
    let mut scale = 1.0f64;
    for value in params.values() {
      if let Ok(v) = value.parse::<f64>() {
        scale *= v.abs().max(1e-3).powf(0.25);
      }
    }
    scale.clamp(0.05, 20.0)
  }
}

fn grid_combinations(grid: &HyperGrid) -> Vec<HyperParams> {
  let mut combos: Vec<HyperParams> = vec![HyperParams::new()];
  for (key, values) in grid {
    let mut next = Vec::with_capacity(combos.len() * values.len());
    for combo in &combos {
      for value in values {
        let mut c = combo.clone();
        c.insert(key.clone(), value.clone());
        next.push(c);
      }
    }
    combos = next;
  }
  combos
}

#[async_trait]
impl TrainBackend for NaiveBackend {
  #[instrument(level = "trace", skip(self, dataset, grid))]
  async fn best_of_grid(
    &self,
    family: ModelFamily,
    dataset: &Path,
    grid: &HyperGrid,
  ) -> Result<TrainOutcome, PipelineError> {
    let data = load_dataset(dataset)?;
    if data.len() < 10 {
      return Err(PipelineError::TrainingFailure {
        family,
        reason: format!("dataset too small: {} rows", data.len()),
      });
    }
    let (train, test) = holdout_indices(data.len());

    let mut best: Option<(MetricBundle, HyperParams, Vec<f64>, f64)> = None;
    for params in grid_combinations(grid) {
      let scale = Self::combo_scale(&params);
      let (weights, bias) = Self::fit(&data, &train, scale);
      let scores: Vec<f64> = test
        .iter()
        .map(|&i| {
          let z: f64 = weights
            .iter()
            .zip(&data.rows[i])
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + bias;
          1.0 / (1.0 + (-z).exp())
        })
        .collect();
      let labels: Vec<bool> = test.iter().map(|&i| data.labels[i]).collect();
      let metrics = evaluate(&scores, &labels);
      debug!(family = %family, f1 = metrics.f1, ?params, "grid point evaluated");
      let better = match &best {
        Some((current, ..)) => metrics.f1 > current.f1,
        None => true,
      };
      if better {
        best = Some((metrics, params, weights, bias));
      }
    }

    let (metrics, best_params, weights, bias) =
      best.ok_or_else(|| PipelineError::TrainingFailure {
        family,
        reason: "empty hyperparameter grid".to_string(),
      })?;

    Ok(TrainOutcome {
      artifact: ChurnArtifact {
        family,
        version: String::new(), // set by the stage, which knows the run id
        weights,
        bias,
        trained_at: Utc::now(),
      },
      metrics,
      best_params,
    })
  }
}
