//! Tests for `model_family`.

use super::model_family::ModelFamily;

#[test]
fn as_str_round_trips_through_serde() {
  for family in ModelFamily::ALL {
    let json = serde_json::to_string(&family).unwrap();
    assert_eq!(json, format!("\"{}\"", family.as_str()));
    let back: ModelFamily = serde_json::from_str(&json).unwrap();
    assert_eq!(back, family);
  }
}

#[test]
fn all_contains_four_distinct_families() {
  let mut names: Vec<&str> = ModelFamily::ALL.iter().map(|f| f.as_str()).collect();
  names.sort_unstable();
  names.dedup();
  assert_eq!(names.len(), 4);
}

#[test]
fn display_matches_as_str() {
  assert_eq!(ModelFamily::Lightgbm.to_string(), "lightgbm");
  assert_eq!(ModelFamily::Xgboost.to_string(), "xgboost");
}
