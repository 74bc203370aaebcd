//! Serving binary: wires the pipeline and serving sides together and exposes
//! the HTTP API.

use churnflow::artifact::FileLoader;
use churnflow::config::AppConfig;
use churnflow::metric_store::MetricStore;
use churnflow::orchestrator::OrchestratorConfig;
use churnflow::registry::InMemoryRegistry;
use churnflow::server::{router, AppState};
use churnflow::tasks::LocalSeedSource;
use churnflow::trainer::NaiveBackend;
use churnflow::{
  spawn_promotion_listener, Gateway, LifecycleManager, ModelHandle, Orchestrator, PromotionWriter,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config_path =
    std::env::var("CHURNFLOW_CONFIG").unwrap_or_else(|_| "configs/churnflow.json".to_string());
  let config = AppConfig::load_or_default(Path::new(&config_path))?;

  let registry = Arc::new(InMemoryRegistry::new());
  let writer = Arc::new(PromotionWriter::new(
    config.promotion_path.clone(),
    registry,
  ));
  let promotion_changes = writer.subscribe();

  let orchestrator = Arc::new(Orchestrator::new(
    OrchestratorConfig {
      data_dir: config.data_dir.clone(),
      artifact_dir: config.artifact_dir.clone(),
      retry: config.retry_policy(),
      task_timeout: Duration::from_secs(config.task_timeout_secs),
    },
    Arc::new(LocalSeedSource::new(config.seed_data_path.clone())),
    Arc::new(NaiveBackend::new()),
    Arc::new(MetricStore::new()),
    writer,
  ));

  let handle = Arc::new(ModelHandle::new());
  let lifecycle = Arc::new(LifecycleManager::new(
    handle.clone(),
    Arc::new(FileLoader::new()),
    config.promotion_path.clone(),
  ));

  // Startup load is the reload operation against whatever record exists.
  match lifecycle.reload().await {
    Ok(status) => info!(?status, "initial model loaded"),
    Err(e) => warn!(error = %e, "starting without a model; /predict returns 503 until one loads"),
  }
  spawn_promotion_listener(lifecycle.clone(), promotion_changes);

  let state = AppState {
    handle,
    lifecycle,
    gateway: Arc::new(Gateway::new(orchestrator)),
  };

  let addr = config.bind_address();
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  info!(%addr, "listening");
  axum::serve(listener, router(state))
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("shutdown signal received");
    })
    .await?;
  Ok(())
}
