//! Ranker: cosine similarity against the reference, 0–10 normalization, stable ordering.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::vectorizer::SparseVector;
use crate::scoring::{ParsePolicyError, ScoringError};

/// How raw similarity maps onto the 0–10 presentation scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `round(raw * 10, 2)`. Comparable across runs and job descriptions.
    #[default]
    Fixed,
    /// `round(raw / max_raw * 10, 2)`, or 0 when every raw score is 0. The top
    /// candidate of a batch always scores 10.
    MaxRelative,
}

impl FromStr for Normalization {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Normalization::Fixed),
            "max_relative" | "max-relative" | "relative" => Ok(Normalization::MaxRelative),
            other => Err(ParsePolicyError {
                kind: "normalization",
                value: other.to_string(),
                expected: "fixed, max_relative",
            }),
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: String,
    pub raw_similarity: f64, // 0.0 – 1.0
    pub normalized_score: f64, // 0.0 – 10.0
}

/// Cosine similarity clamped to [0, 1]. Zero when either vector has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    debug_assert_eq!(a.dims(), b.dims(), "vectors from different feature spaces");
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Maps a raw similarity onto the 0–10 scale. `batch_max` is only read for
/// [`Normalization::MaxRelative`].
pub fn normalize(raw: f64, batch_max: f64, normalization: Normalization) -> f64 {
    match normalization {
        Normalization::Fixed => round2(raw * 10.0),
        Normalization::MaxRelative => {
            if batch_max <= 0.0 {
                0.0
            } else {
                round2(raw / batch_max * 10.0)
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores each candidate against `reference` and returns records sorted best first.
///
/// Sorting is stable on the normalized score, so candidates that share a normalized
/// score keep their input order even when their raw similarities differ.
pub fn rank(
    reference: &SparseVector,
    candidates: &[(String, SparseVector)],
    normalization: Normalization,
) -> Result<Vec<ScoreRecord>, ScoringError> {
    if candidates.is_empty() {
        return Err(ScoringError::NoCandidates);
    }

    let raw: Vec<f64> = candidates
        .iter()
        .map(|(_, v)| cosine_similarity(reference, v))
        .collect();
    let batch_max = raw.iter().copied().fold(0.0_f64, f64::max);

    let mut records: Vec<ScoreRecord> = candidates
        .iter()
        .zip(raw)
        .map(|((id, _), raw_similarity)| ScoreRecord {
            id: id.clone(),
            raw_similarity,
            normalized_score: normalize(raw_similarity, batch_max, normalization),
        })
        .collect();

    records.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
    Ok(records)
}
