//! Scoring pipeline: corpus in, ranked [`ScoreRecord`]s out.
//!
//! Policies are picked once via [`ScoringOptions`] and applied to the whole run.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scoring::ranker::{rank, Normalization, ScoreRecord};
use crate::scoring::tokenizer::NgramRange;
use crate::scoring::vectorizer::{vectorize, FitScope, VectorizerOptions};
use crate::scoring::ScoringError;

/// A document handed to the core by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Reference text plus a non-empty, ordered list of candidates.
#[derive(Debug, Clone)]
pub struct Corpus {
    reference: String,
    candidates: Vec<Document>,
}

impl Corpus {
    pub fn new(reference: impl Into<String>, candidates: Vec<Document>) -> Result<Self, ScoringError> {
        if candidates.is_empty() {
            return Err(ScoringError::NoCandidates);
        }
        Ok(Self {
            reference: reference.into(),
            candidates,
        })
    }

    pub fn candidates(&self) -> &[Document] {
        &self.candidates
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOptions {
    pub fit_scope: FitScope,
    pub ngram_range: NgramRange,
    pub normalization: Normalization,
}

impl ScoringOptions {
    fn vectorizer(&self) -> VectorizerOptions {
        VectorizerOptions {
            fit_scope: self.fit_scope,
            ngram_range: self.ngram_range,
        }
    }
}

/// Result of [`score_or_zero`].
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub records: Vec<ScoreRecord>,
    /// Set when the reference had no usable terms and every candidate was scored 0.
    pub reference_empty: bool,
}

/// Vectorizes and ranks the corpus.
pub fn score(corpus: &Corpus, options: &ScoringOptions) -> Result<Vec<ScoreRecord>, ScoringError> {
    let started = Instant::now();

    let texts: Vec<&str> = corpus.candidates.iter().map(|d| d.text.as_str()).collect();
    let vectorized = vectorize(&corpus.reference, &texts, &options.vectorizer())?;

    let labelled: Vec<(String, _)> = corpus
        .candidates
        .iter()
        .map(|d| d.id.clone())
        .zip(vectorized.candidates)
        .collect();
    let records = rank(&vectorized.reference, &labelled, options.normalization)?;

    debug!(
        candidates = records.len(),
        vocabulary = vectorized.vocabulary_size,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Scored corpus"
    );
    Ok(records)
}

/// Like [`score`], but an empty reference vocabulary yields zero scores for every
/// candidate (in input order) instead of an error. Other errors propagate.
pub fn score_or_zero(corpus: &Corpus, options: &ScoringOptions) -> Result<Scored, ScoringError> {
    match score(corpus, options) {
        Ok(records) => Ok(Scored {
            records,
            reference_empty: false,
        }),
        Err(ScoringError::EmptyVocabulary) => {
            warn!(
                candidates = corpus.candidates.len(),
                "Reference text has no usable terms; scoring all candidates as 0"
            );
            let records = corpus
                .candidates
                .iter()
                .map(|d| ScoreRecord {
                    id: d.id.clone(),
                    raw_similarity: 0.0,
                    normalized_score: 0.0,
                })
                .collect();
            Ok(Scored {
                records,
                reference_empty: true,
            })
        }
        Err(e) => Err(e),
    }
}
