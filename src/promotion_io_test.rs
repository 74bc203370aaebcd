//! Tests for `promotion_io`.

use crate::promotion_io::{load_promotion, save_promotion};
use crate::types::{ModelFamily, ModelRef, PromotionRecord};

pub(crate) fn record(champion_uri: &str, challenger_uri: &str) -> PromotionRecord {
  PromotionRecord::new(
    ModelRef {
      family: ModelFamily::Lightgbm,
      version: "v7".to_string(),
      artifact_uri: champion_uri.to_string(),
      accuracy: 0.83,
    },
    ModelRef {
      family: ModelFamily::Xgboost,
      version: "v7".to_string(),
      artifact_uri: challenger_uri.to_string(),
      accuracy: 0.81,
    },
  )
}

#[test]
fn save_then_load_round_trips() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("configs").join("promotion.json");
  let original = record("a.json", "b.json");
  save_promotion(&path, &original).unwrap();
  let loaded = load_promotion(&path).unwrap();
  assert_eq!(loaded, original);
}

#[test]
fn save_creates_parent_directories() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("deep/nested/promotion.json");
  save_promotion(&path, &record("a.json", "b.json")).unwrap();
  assert!(path.exists());
}

#[test]
fn save_replaces_whole_record() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("promotion.json");
  save_promotion(&path, &record("old-champ.json", "old-chall.json")).unwrap();
  save_promotion(&path, &record("new-champ.json", "new-chall.json")).unwrap();

  let loaded = load_promotion(&path).unwrap();
  // Champion and challenger always come from the same promotion call.
  assert_eq!(loaded.model_uri, "new-champ.json");
  assert_eq!(loaded.fallback_model_uri, "new-chall.json");
  // No temp file left behind.
  assert!(!path.with_file_name("promotion.json.tmp").exists());
}

#[test]
fn load_missing_file_errors() {
  let dir = tempfile::tempdir().unwrap();
  assert!(load_promotion(&dir.path().join("promotion.json")).is_err());
}

#[test]
fn load_invalid_json_errors() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("promotion.json");
  std::fs::write(&path, b"{not json").unwrap();
  assert!(load_promotion(&path).is_err());
}
