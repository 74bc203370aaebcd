//! Model registry seam: advisory champion/challenger alias pointers.

use crate::error::RegistryUpdateFailure;
use crate::types::ModelRef;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Alias name for the promoted primary model.
pub const CHAMPION_ALIAS: &str = "champion";
/// Alias name for the promoted fallback model.
pub const CHALLENGER_ALIAS: &str = "challenger";

/// External model registry. Alias updates are advisory: the promotion record
/// on disk is the source of truth, so callers log registry failures and move
/// on.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
  /// Points `alias` at the given model version.
  async fn set_alias(&self, alias: &str, model: &ModelRef) -> Result<(), RegistryUpdateFailure>;
}

/// In-process registry keeping alias pointers in memory. Stands in for a
/// remote registry server in tests and single-node deployments.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
  aliases: Mutex<HashMap<String, ModelRef>>,
}

impl InMemoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Current target of an alias, if set.
  pub fn alias(&self, alias: &str) -> Option<ModelRef> {
    let aliases = self.aliases.lock().unwrap_or_else(|e| e.into_inner());
    aliases.get(alias).cloned()
  }

  /// Registry-style URI for an aliased model, e.g. `models:/lightgbm@champion`.
  pub fn alias_uri(model: &ModelRef, alias: &str) -> String {
    format!("models:/{}@{alias}", model.family)
  }
}

#[async_trait]
impl ModelRegistry for InMemoryRegistry {
  async fn set_alias(&self, alias: &str, model: &ModelRef) -> Result<(), RegistryUpdateFailure> {
    let mut aliases = self.aliases.lock().unwrap_or_else(|e| e.into_inner());
    aliases.insert(alias.to_string(), model.clone());
    Ok(())
  }
}
