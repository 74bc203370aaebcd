//! HTTP surface: prediction, reload, and pipeline trigger/status endpoints.

use crate::gateway::Gateway;
use crate::lifecycle::LifecycleManager;
use crate::model_handle::{LoadStatus, ModelHandle};
use crate::types::{PredictionRequest, PredictionResponse, RunId};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
  pub handle: Arc<ModelHandle>,
  pub lifecycle: Arc<LifecycleManager>,
  pub gateway: Arc<Gateway>,
}

/// Builds the full router. Prediction lives under `/api/v1`; the lifecycle
/// and pipeline endpoints are unversioned operator surfaces.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(banner))
    .route("/api/v1/predict", post(predict))
    .route("/reload", get(reload))
    .route("/trigger-training", post(trigger_training))
    .route("/training-status/:run_id", get(training_status))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn banner() -> Json<serde_json::Value> {
  Json(json!({
    "service": "churnflow",
    "message": "Churn prediction service is running",
  }))
}

/// Churn decision for one customer record. Out-of-enum categorical values are
/// rejected by deserialization (422) before this handler runs.
async fn predict(
  State(state): State<AppState>,
  Json(request): Json<PredictionRequest>,
) -> Response {
  if let Err(reason) = request.validate() {
    return (
      StatusCode::UNPROCESSABLE_ENTITY,
      Json(json!({ "detail": reason })),
    )
      .into_response();
  }
  match state.handle.current_model() {
    Some(model) => {
      let churn = model.predict(&request.to_features());
      Json(PredictionResponse {
        churn_prediction: churn,
      })
      .into_response()
    }
    None => {
      warn!("prediction rejected, no model loaded");
      (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "detail": "no model is loaded" })),
      )
        .into_response()
    }
  }
}

/// Re-resolves the promotion record and swaps the handle. Reports the state
/// the handle ended up in.
async fn reload(State(state): State<AppState>) -> Response {
  match state.lifecycle.reload().await {
    Ok(LoadStatus::Ok) => Json(json!({ "state": "ACTIVE" })).into_response(),
    Ok(LoadStatus::Degraded) => Json(json!({ "state": "DEGRADED" })).into_response(),
    Err(e) => {
      warn!(error = %e, "reload request failed");
      (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "detail": e.to_string() })),
      )
        .into_response()
    }
  }
}

async fn trigger_training(State(state): State<AppState>) -> Response {
  let run_id = state.gateway.trigger_training();
  info!(%run_id, "training triggered via API");
  (
    StatusCode::ACCEPTED,
    Json(json!({ "run_id": run_id, "state": "RUNNING" })),
  )
    .into_response()
}

async fn training_status(
  State(state): State<AppState>,
  Path(run_id): Path<String>,
) -> Response {
  let run_id: RunId = match run_id.parse() {
    Ok(id) => id,
    Err(_) => {
      return (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": format!("not a run id: {run_id}") })),
      )
        .into_response();
    }
  };
  match state.gateway.training_status(run_id) {
    Ok(run) => Json(run).into_response(),
    Err(e) => (
      StatusCode::NOT_FOUND,
      Json(json!({ "detail": e.to_string() })),
    )
      .into_response(),
  }
}
