// Scoring core: TF-IDF vectorization, cosine ranking, score normalization.
// Pure, synchronous computation. All I/O happens in the callers (extraction, handlers).

pub mod pipeline;
pub mod ranker;
pub mod stop_words;
pub mod tokenizer;
pub mod vectorizer;

use thiserror::Error;

pub use pipeline::{score, score_or_zero, Corpus, Document, Scored, ScoringOptions};
pub use ranker::{Normalization, ScoreRecord};
pub use tokenizer::NgramRange;
pub use vectorizer::FitScope;

/// Failures raised by the scoring core. Never retried: the computation is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Reference text has no usable terms after stopword filtering")]
    EmptyVocabulary,

    #[error("No candidate documents supplied")]
    NoCandidates,
}

/// Returned when a policy name from configuration does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParsePolicyError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
