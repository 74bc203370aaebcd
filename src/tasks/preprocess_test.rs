//! Tests for `preprocess`.

use super::preprocess::{preprocess, PROCESSED_HEADERS};
use std::path::PathBuf;

const RAW_HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,\
MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,\
StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,\
TotalCharges,Churn";

fn write_raw(dir: &std::path::Path, rows: &[&str]) -> PathBuf {
  let path = dir.join("raw.csv");
  let mut contents = String::from(RAW_HEADER);
  for row in rows {
    contents.push('\n');
    contents.push_str(row);
  }
  contents.push('\n');
  std::fs::write(&path, contents).unwrap();
  path
}

fn good_row() -> &'static str {
  "7590-VHVEG,Female,0,Yes,No,1,No,No phone service,DSL,No,Yes,No,No,No,No,\
Month-to-month,Yes,Electronic check,29.85,29.85,No"
}

#[test]
fn encodes_a_clean_row() {
  let dir = tempfile::tempdir().unwrap();
  let raw = write_raw(dir.path(), &[good_row()]);
  let out = dir.path().join("processed.csv");

  let result = preprocess(&raw, &out).unwrap();
  assert_eq!(result.rows_written, 1);
  assert_eq!(result.rows_dropped, 0);

  let mut reader = csv::Reader::from_path(&out).unwrap();
  let headers = reader.headers().unwrap().clone();
  assert_eq!(headers.len(), PROCESSED_HEADERS.len());
  assert_eq!(&headers[0], "SeniorCitizen");
  assert_eq!(&headers[17], "Churn");

  let record = reader.records().next().unwrap().unwrap();
  // SeniorCitizen=0, Partner=Yes, Dependents=No, tenure=1, PhoneService=No, InternetService=DSL
  assert_eq!(&record[0], "0");
  assert_eq!(&record[1], "1");
  assert_eq!(&record[2], "0");
  assert_eq!(&record[3], "1");
  assert_eq!(&record[4], "0");
  assert_eq!(&record[5], "1");
  // Contract=Month-to-month, PaperlessBilling=Yes, PaymentMethod=Electronic check
  assert_eq!(&record[12], "0");
  assert_eq!(&record[13], "1");
  assert_eq!(&record[14], "0");
  assert_eq!(&record[18 - 1], "0"); // Churn=No
}

#[test]
fn blank_total_charges_becomes_zero() {
  let dir = tempfile::tempdir().unwrap();
  let row = "0002-ORFBO,Male,0,No,No,0,Yes,No,DSL,Yes,No,No,No,No,No,\
Two year,No,Mailed check,52.55, ,No";
  let raw = write_raw(dir.path(), &[row]);
  let out = dir.path().join("processed.csv");

  let result = preprocess(&raw, &out).unwrap();
  assert_eq!(result.rows_written, 1);

  let mut reader = csv::Reader::from_path(&out).unwrap();
  let record = reader.records().next().unwrap().unwrap();
  assert_eq!(&record[16], "0");
}

#[test]
fn unmappable_rows_are_dropped() {
  let dir = tempfile::tempdir().unwrap();
  let bad = "0003-X,Male,0,No,No,4,Yes,No,Satellite,Yes,No,No,No,No,No,\
Two year,No,Mailed check,52.55,200.1,No";
  let raw = write_raw(dir.path(), &[good_row(), bad]);
  let out = dir.path().join("processed.csv");

  let result = preprocess(&raw, &out).unwrap();
  assert_eq!(result.rows_written, 1);
  assert_eq!(result.rows_dropped, 1);
}

#[test]
fn missing_required_column_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("raw.csv");
  std::fs::write(&path, "customerID,tenure\nx,1\n").unwrap();
  assert!(preprocess(&path, &dir.path().join("out.csv")).is_err());
}
