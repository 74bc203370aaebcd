//! Prediction request/response schema for the serving API.
//!
//! Categorical fields are closed enums, so an out-of-enum value (e.g.
//! `InternetService: "Satellite"`) fails deserialization and is rejected
//! before it can reach the model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Female,
  Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
  Yes,
  No,
}

impl YesNo {
  fn encode(self) -> f64 {
    match self {
      YesNo::Yes => 1.0,
      YesNo::No => 0.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultipleLines {
  Yes,
  No,
  #[serde(rename = "No phone service")]
  NoPhoneService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetService {
  #[serde(rename = "DSL")]
  Dsl,
  #[serde(rename = "Fiber optic")]
  FiberOptic,
  No,
}

impl InternetService {
  fn encode(self) -> f64 {
    match self {
      InternetService::No => 0.0,
      InternetService::Dsl => 1.0,
      InternetService::FiberOptic => 2.0,
    }
  }
}

/// Value set shared by the six internet add-on services (OnlineSecurity,
/// OnlineBackup, DeviceProtection, TechSupport, StreamingTV,
/// StreamingMovies). "No internet service" encodes the same as "No".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetOption {
  Yes,
  No,
  #[serde(rename = "No internet service")]
  NoInternetService,
}

impl InternetOption {
  fn encode(self) -> f64 {
    match self {
      InternetOption::Yes => 1.0,
      InternetOption::No | InternetOption::NoInternetService => 0.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contract {
  #[serde(rename = "Month-to-month")]
  MonthToMonth,
  #[serde(rename = "One year")]
  OneYear,
  #[serde(rename = "Two year")]
  TwoYear,
}

impl Contract {
  fn encode(self) -> f64 {
    match self {
      Contract::MonthToMonth => 0.0,
      Contract::OneYear => 1.0,
      Contract::TwoYear => 2.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "Electronic check")]
  ElectronicCheck,
  #[serde(rename = "Mailed check")]
  MailedCheck,
  #[serde(rename = "Bank transfer (automatic)")]
  BankTransfer,
  #[serde(rename = "Credit card (automatic)")]
  CreditCard,
}

impl PaymentMethod {
  fn encode(self) -> f64 {
    match self {
      PaymentMethod::ElectronicCheck => 0.0,
      PaymentMethod::MailedCheck => 1.0,
      PaymentMethod::BankTransfer => 2.0,
      PaymentMethod::CreditCard => 3.0,
    }
  }
}

/// One customer record submitted for a churn decision. Stateless: nothing is
/// persisted beyond the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
  pub gender: Gender,
  #[serde(rename = "SeniorCitizen")]
  pub senior_citizen: u8,
  #[serde(rename = "Partner")]
  pub partner: YesNo,
  #[serde(rename = "Dependents")]
  pub dependents: YesNo,
  pub tenure: u32,
  #[serde(rename = "PhoneService")]
  pub phone_service: YesNo,
  #[serde(rename = "MultipleLines")]
  pub multiple_lines: MultipleLines,
  #[serde(rename = "InternetService")]
  pub internet_service: InternetService,
  #[serde(rename = "OnlineSecurity")]
  pub online_security: InternetOption,
  #[serde(rename = "OnlineBackup")]
  pub online_backup: InternetOption,
  #[serde(rename = "DeviceProtection")]
  pub device_protection: InternetOption,
  #[serde(rename = "TechSupport")]
  pub tech_support: InternetOption,
  #[serde(rename = "StreamingTV")]
  pub streaming_tv: InternetOption,
  #[serde(rename = "StreamingMovies")]
  pub streaming_movies: InternetOption,
  #[serde(rename = "Contract")]
  pub contract: Contract,
  #[serde(rename = "PaperlessBilling")]
  pub paperless_billing: YesNo,
  #[serde(rename = "PaymentMethod")]
  pub payment_method: PaymentMethod,
  #[serde(rename = "MonthlyCharges")]
  pub monthly_charges: f64,
  #[serde(rename = "TotalCharges")]
  pub total_charges: f64,
}

impl PredictionRequest {
  /// Range checks that the type system does not express. Returns a message
  /// describing the first violation.
  pub fn validate(&self) -> Result<(), String> {
    if self.senior_citizen > 1 {
      return Err(format!(
        "SeniorCitizen must be 0 or 1, got {}",
        self.senior_citizen
      ));
    }
    if !self.monthly_charges.is_finite() || self.monthly_charges < 0.0 {
      return Err(format!(
        "MonthlyCharges must be a non-negative number, got {}",
        self.monthly_charges
      ));
    }
    if !self.total_charges.is_finite() || self.total_charges < 0.0 {
      return Err(format!(
        "TotalCharges must be a non-negative number, got {}",
        self.total_charges
      ));
    }
    Ok(())
  }

  /// Encodes the request into the feature vector the models were trained on.
  /// Matches the preprocessing encoding exactly; `gender` and `MultipleLines`
  /// are accepted on the wire but dropped by preprocessing, so they carry no
  /// feature.
  pub fn to_features(&self) -> Vec<f64> {
    vec![
      f64::from(self.senior_citizen),
      self.partner.encode(),
      self.dependents.encode(),
      f64::from(self.tenure),
      self.phone_service.encode(),
      self.internet_service.encode(),
      self.online_security.encode(),
      self.online_backup.encode(),
      self.device_protection.encode(),
      self.tech_support.encode(),
      self.streaming_tv.encode(),
      self.streaming_movies.encode(),
      self.contract.encode(),
      self.paperless_billing.encode(),
      self.payment_method.encode(),
      self.monthly_charges,
      self.total_charges,
    ]
  }
}

/// Number of features produced by [PredictionRequest::to_features] and by the
/// preprocessing stage (excluding the Churn label).
pub const FEATURE_COUNT: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
  pub churn_prediction: bool,
}
