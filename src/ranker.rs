//! Candidate ranking and champion/challenger selection.

use crate::error::PipelineError;
use crate::types::TrainingCandidate;
use std::cmp::Ordering;
use tracing::{info, instrument};

/// Champion/challenger pair plus the full ranking it was taken from.
#[derive(Debug, Clone)]
pub struct Selection {
  pub champion: TrainingCandidate,
  pub challenger: TrainingCandidate,
  /// All candidates, best first.
  pub ranked: Vec<TrainingCandidate>,
}

/// Ordering key: accuracy descending, ties broken by F1 descending, then by
/// family name ascending. Total and deterministic, so repeated runs over
/// identical metrics always promote the same champion.
fn compare(a: &TrainingCandidate, b: &TrainingCandidate) -> Ordering {
  b.metrics
    .accuracy
    .total_cmp(&a.metrics.accuracy)
    .then_with(|| b.metrics.f1.total_cmp(&a.metrics.f1))
    .then_with(|| a.family.as_str().cmp(b.family.as_str()))
}

/// Ranks candidates and picks champion (rank 0) and challenger (rank 1).
/// Requires at least 2 candidates.
#[instrument(level = "trace", skip(candidates))]
pub fn rank(candidates: Vec<TrainingCandidate>) -> Result<Selection, PipelineError> {
  if candidates.len() < 2 {
    return Err(PipelineError::InsufficientCandidates {
      count: candidates.len(),
    });
  }

  let mut ranked = candidates;
  ranked.sort_by(compare);

  let champion = ranked[0].clone();
  let challenger = ranked[1].clone();
  info!(
    champion = %champion.family,
    champion_accuracy = champion.metrics.accuracy,
    challenger = %challenger.family,
    challenger_accuracy = challenger.metrics.accuracy,
    "candidates ranked"
  );

  Ok(Selection {
    champion,
    challenger,
    ranked,
  })
}
