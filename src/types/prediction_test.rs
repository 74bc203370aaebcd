//! Tests for the prediction request schema.

use super::prediction::{PredictionRequest, FEATURE_COUNT};

pub(crate) fn sample_json() -> serde_json::Value {
  serde_json::json!({
    "gender": "Female",
    "SeniorCitizen": 0,
    "Partner": "No",
    "Dependents": "No",
    "tenure": 8,
    "PhoneService": "Yes",
    "MultipleLines": "No",
    "InternetService": "Fiber optic",
    "OnlineSecurity": "No",
    "OnlineBackup": "No",
    "DeviceProtection": "Yes",
    "TechSupport": "No",
    "StreamingTV": "Yes",
    "StreamingMovies": "Yes",
    "Contract": "Month-to-month",
    "PaperlessBilling": "Yes",
    "PaymentMethod": "Electronic check",
    "MonthlyCharges": 99.65,
    "TotalCharges": 820.5
  })
}

#[test]
fn sample_request_deserializes_and_validates() {
  let request: PredictionRequest = serde_json::from_value(sample_json()).unwrap();
  assert!(request.validate().is_ok());
}

#[test]
fn out_of_enum_internet_service_is_rejected() {
  let mut body = sample_json();
  body["InternetService"] = "Satellite".into();
  let result: Result<PredictionRequest, _> = serde_json::from_value(body);
  assert!(result.is_err());
}

#[test]
fn out_of_enum_payment_method_is_rejected() {
  let mut body = sample_json();
  body["PaymentMethod"] = "Cash".into();
  let result: Result<PredictionRequest, _> = serde_json::from_value(body);
  assert!(result.is_err());
}

#[test]
fn negative_tenure_is_rejected_at_deserialization() {
  let mut body = sample_json();
  body["tenure"] = (-3).into();
  let result: Result<PredictionRequest, _> = serde_json::from_value(body);
  assert!(result.is_err());
}

#[test]
fn senior_citizen_above_one_fails_validation() {
  let mut body = sample_json();
  body["SeniorCitizen"] = 2.into();
  let request: PredictionRequest = serde_json::from_value(body).unwrap();
  assert!(request.validate().is_err());
}

#[test]
fn negative_charges_fail_validation() {
  let mut body = sample_json();
  body["TotalCharges"] = (-1.0).into();
  let request: PredictionRequest = serde_json::from_value(body).unwrap();
  assert!(request.validate().is_err());
}

#[test]
fn feature_vector_matches_training_encoding() {
  let request: PredictionRequest = serde_json::from_value(sample_json()).unwrap();
  let features = request.to_features();
  assert_eq!(features.len(), FEATURE_COUNT);
  // SeniorCitizen, Partner, Dependents, tenure, PhoneService, InternetService
  assert_eq!(&features[..6], &[0.0, 0.0, 0.0, 8.0, 1.0, 2.0]);
  // Contract (Month-to-month), PaperlessBilling, PaymentMethod (Electronic check)
  assert_eq!(&features[12..15], &[0.0, 1.0, 0.0]);
  assert_eq!(features[15], 99.65);
  assert_eq!(features[16], 820.5);
}

#[test]
fn no_internet_service_encodes_as_no() {
  let mut body = sample_json();
  body["InternetService"] = "No".into();
  for key in [
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
  ] {
    body[key] = "No internet service".into();
  }
  let request: PredictionRequest = serde_json::from_value(body).unwrap();
  let features = request.to_features();
  assert_eq!(&features[5..12], &[0.0; 7]);
}
