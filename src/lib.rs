//! # churnflow
//!
//! Retraining pipeline and zero-downtime serving for a churn classifier.
//!
//! ## Architecture
//!
//! The pipeline side runs a fixed task graph per triggered run:
//! ingest → preprocess → one training task per model family (in parallel) →
//! select_and_promote. Candidates land in the [metric_store], the [ranker]
//! orders them deterministically, and the [promoter] persists the
//! champion/challenger pair atomically.
//!
//! The serving side holds the active model in a [model_handle] that is
//! swapped by reference, so predictions never block on a reload. The
//! [lifecycle] manager resolves the promotion record, falls back to the
//! challenger when the champion will not load, and listens for promotion
//! signals from the writer.

pub mod artifact;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod metric_store;
#[cfg(test)]
mod metric_store_test;
pub mod model_handle;
pub mod orchestrator;
pub mod promoter;
pub mod promotion_io;
#[cfg(test)]
mod promotion_io_test;
pub mod ranker;
pub mod registry;
pub mod server;
pub mod tasks;
pub mod trainer;
#[cfg(test)]
mod trainer_test;
pub mod types;

pub use gateway::Gateway;
pub use lifecycle::{spawn_promotion_listener, LifecycleManager};
pub use model_handle::ModelHandle;
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunConfig};
pub use promoter::PromotionWriter;
