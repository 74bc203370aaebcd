//! Preprocessing: clean the raw telco CSV and encode features numerically.
//!
//! Mirrors the production feature encoding exactly (the serving request
//! encoder in `types::prediction` must stay in lockstep): customerID, gender
//! and MultipleLines are dropped, Yes/No become 1/0, the ordinal categoricals
//! get their fixed codes, blank TotalCharges becomes 0.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Output column order of the processed CSV: the 17 features consumed by
/// training plus the trailing Churn label.
pub const PROCESSED_HEADERS: [&str; 18] = [
  "SeniorCitizen",
  "Partner",
  "Dependents",
  "tenure",
  "PhoneService",
  "InternetService",
  "OnlineSecurity",
  "OnlineBackup",
  "DeviceProtection",
  "TechSupport",
  "StreamingTV",
  "StreamingMovies",
  "Contract",
  "PaperlessBilling",
  "PaymentMethod",
  "MonthlyCharges",
  "TotalCharges",
  "Churn",
];

/// Raw columns that never make it into the feature set.
const DROPPED_COLUMNS: [&str; 3] = ["customerID", "gender", "MultipleLines"];

#[derive(Debug)]
pub struct PreprocessOutput {
  pub processed_data_path: PathBuf,
  pub rows_written: usize,
  /// Rows discarded for missing or unmappable values.
  pub rows_dropped: usize,
}

fn yes_no(value: &str) -> Option<f64> {
  match value {
    "Yes" => Some(1.0),
    "No" => Some(0.0),
    _ => None,
  }
}

fn internet_option(value: &str) -> Option<f64> {
  match value {
    "Yes" => Some(1.0),
    "No" | "No internet service" => Some(0.0),
    _ => None,
  }
}

fn encode_column(name: &str, value: &str) -> Option<f64> {
  match name {
    "SeniorCitizen" => match value {
      "0" => Some(0.0),
      "1" => Some(1.0),
      _ => None,
    },
    "Partner" | "Dependents" | "PhoneService" | "PaperlessBilling" => yes_no(value),
    "InternetService" => match value {
      "No" => Some(0.0),
      "DSL" => Some(1.0),
      "Fiber optic" => Some(2.0),
      _ => None,
    },
    "OnlineSecurity" | "OnlineBackup" | "DeviceProtection" | "TechSupport" | "StreamingTV"
    | "StreamingMovies" => internet_option(value),
    "Contract" => match value {
      "Month-to-month" => Some(0.0),
      "One year" => Some(1.0),
      "Two year" => Some(2.0),
      _ => None,
    },
    "PaymentMethod" => match value {
      "Electronic check" => Some(0.0),
      "Mailed check" => Some(1.0),
      "Bank transfer (automatic)" => Some(2.0),
      "Credit card (automatic)" => Some(3.0),
      _ => None,
    },
    "tenure" | "MonthlyCharges" => value.trim().parse().ok(),
    // Blank in the source data for customers with zero tenure.
    "TotalCharges" => Some(value.trim().parse().unwrap_or(0.0)),
    "Churn" => yes_no(value),
    _ => None,
  }
}

/// Cleans and encodes the raw CSV at `raw_data_path`, writing the processed
/// CSV to `output_path`. Rows with missing or out-of-vocabulary values are
/// dropped (counted in the output).
#[instrument(level = "trace", skip(raw_data_path, output_path))]
pub fn preprocess(
  raw_data_path: &Path,
  output_path: &Path,
) -> Result<PreprocessOutput, PipelineError> {
  let mut reader = csv::Reader::from_path(raw_data_path)?;
  let headers = reader.headers()?.clone();

  // Column index per processed header; all must exist in the raw file.
  let mut indices = Vec::with_capacity(PROCESSED_HEADERS.len());
  for name in PROCESSED_HEADERS {
    let idx = headers.iter().position(|h| h == name).ok_or_else(|| {
      PipelineError::Dataset(format!("raw data is missing column {name:?}"))
    })?;
    indices.push(idx);
  }

  if let Some(parent) = output_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  let mut writer = csv::Writer::from_path(output_path)?;
  writer.write_record(PROCESSED_HEADERS)?;

  let mut rows_written = 0usize;
  let mut rows_dropped = 0usize;
  for result in reader.records() {
    let record = result?;
    // dropna: the original discards any row with a missing value in a kept
    // column (TotalCharges excepted, which coerces blank to 0).
    let mut encoded = Vec::with_capacity(PROCESSED_HEADERS.len());
    let mut ok = true;
    for (name, &idx) in PROCESSED_HEADERS.iter().zip(&indices) {
      let raw = record.get(idx).unwrap_or("");
      match encode_column(name, raw) {
        Some(v) => encoded.push(v),
        None => {
          ok = false;
          break;
        }
      }
    }
    if !ok {
      rows_dropped += 1;
      continue;
    }
    let fields: Vec<String> = encoded.iter().map(|v| v.to_string()).collect();
    writer.write_record(&fields)?;
    rows_written += 1;
  }
  writer.flush()?;

  if rows_dropped > 0 {
    warn!(rows_dropped, "dropped rows with missing or unmappable values");
  }
  info!(
    rows_written,
    path = %output_path.display(),
    "processed data written"
  );
  // DROPPED_COLUMNS are simply never selected; assert the invariant in debug.
  debug_assert!(DROPPED_COLUMNS.iter().all(|c| !PROCESSED_HEADERS.contains(c)));

  Ok(PreprocessOutput {
    processed_data_path: output_path.to_path_buf(),
    rows_written,
    rows_dropped,
  })
}
