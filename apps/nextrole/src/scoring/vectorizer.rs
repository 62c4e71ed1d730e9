//! TF-IDF vectorizer.
//!
//! Builds a [`FeatureSpace`] (vocabulary + smoothed IDF weights) from an explicit training
//! set chosen by [`FitScope`], then projects every document into that space as an
//! L2-normalized [`SparseVector`]. Terms outside the vocabulary are dropped.
//!
//! IDF: `ln((1 + n) / (1 + df)) + 1`, term frequency is the raw count.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::iter;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::tokenizer::{terms, NgramRange};
use crate::scoring::{ParsePolicyError, ScoringError};

/// Which documents the vocabulary and IDF weights are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitScope {
    /// Reference text only. Candidate scores do not depend on the other candidates.
    #[default]
    Reference,
    /// Reference plus every candidate. Scores shift when the candidate set changes.
    Joint,
}

impl FromStr for FitScope {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "reference_only" => Ok(FitScope::Reference),
            "joint" => Ok(FitScope::Joint),
            other => Err(ParsePolicyError {
                kind: "fit scope",
                value: other.to_string(),
                expected: "reference, joint",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerOptions {
    pub fit_scope: FitScope,
    pub ngram_range: NgramRange,
}

// ────────────────────────────────────────────────────────────────────────────
// Sparse vectors
// ────────────────────────────────────────────────────────────────────────────

/// Sparse vector over a [`FeatureSpace`]. Entries are sorted by dimension index and
/// every stored weight is strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    dims: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// The all-zero vector of the given dimensionality.
    #[cfg(test)]
    pub fn zeros(dims: usize) -> Self {
        Self {
            dims,
            entries: Vec::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product via a merge over the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feature space
// ────────────────────────────────────────────────────────────────────────────

/// Vocabulary and IDF weights for one scoring run.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    ngram_range: NgramRange,
    /// term → dimension index, assigned in lexicographic term order
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl FeatureSpace {
    /// Fits a feature space on the given training documents.
    pub fn fit(documents: &[&str], ngram_range: NgramRange) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| terms(d, ngram_range))
            .collect();
        let n = tokenized.len() as f64;

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &tokenized {
            let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        Self {
            ngram_range,
            vocabulary,
            idf,
        }
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    /// IDF weight of `term`, if it is in the vocabulary.
    #[cfg(test)]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }

    /// Projects `text` into this space.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(text, self.ngram_range) {
            if let Some(&idx) = self.vocabulary.get(term.as_str()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        SparseVector {
            dims: self.len(),
            entries,
        }
    }
}

/// Output of [`vectorize`]: one vector per document, all over the same space.
#[derive(Debug, Clone)]
pub struct Vectorized {
    pub vocabulary_size: usize,
    pub reference: SparseVector,
    pub candidates: Vec<SparseVector>,
}

/// Vectorizes a reference text and candidate texts into a shared TF-IDF space.
///
/// Fails with [`ScoringError::EmptyVocabulary`] when the reference yields no terms,
/// regardless of fit scope.
pub fn vectorize<S: AsRef<str>>(
    reference: &str,
    candidates: &[S],
    options: &VectorizerOptions,
) -> Result<Vectorized, ScoringError> {
    let training: Vec<&str> = match options.fit_scope {
        FitScope::Reference => vec![reference],
        FitScope::Joint => iter::once(reference)
            .chain(candidates.iter().map(|c| c.as_ref()))
            .collect(),
    };
    let space = FeatureSpace::fit(&training, options.ngram_range);

    // Every reference term is in the vocabulary under both scopes, so a zero
    // reference vector means the reference had no terms at all.
    let reference = space.transform(reference);
    if reference.is_zero() {
        return Err(ScoringError::EmptyVocabulary);
    }

    Ok(Vectorized {
        vocabulary_size: space.len(),
        reference,
        candidates: candidates
            .iter()
            .map(|c| space.transform(c.as_ref()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(fit_scope: FitScope, ngram_range: NgramRange) -> VectorizerOptions {
        VectorizerOptions {
            fit_scope,
            ngram_range,
        }
    }

    #[test]
    fn test_empty_reference_fails() {
        let err = vectorize("", &["rust engineer"], &VectorizerOptions::default()).unwrap_err();
        assert_eq!(err, ScoringError::EmptyVocabulary);
    }

    #[test]
    fn test_stopword_only_reference_fails_even_when_joint() {
        let err = vectorize(
            "the and of with",
            &["rust engineer"],
            &opts(FitScope::Joint, NgramRange::Unigram),
        )
        .unwrap_err();
        assert_eq!(err, ScoringError::EmptyVocabulary);
    }

    #[test]
    fn test_reference_fit_ignores_candidate_only_terms() {
        let v = vectorize(
            "rust engineer",
            &["rust kafka kubernetes"],
            &VectorizerOptions::default(),
        )
        .unwrap();
        assert_eq!(v.vocabulary_size, 2);
        assert_eq!(v.candidates[0].entries().len(), 1);
    }

    #[test]
    fn test_joint_fit_includes_candidate_terms() {
        let v = vectorize(
            "rust engineer",
            &["rust kafka kubernetes"],
            &opts(FitScope::Joint, NgramRange::Unigram),
        )
        .unwrap();
        // engineer, kafka, kubernetes, rust
        assert_eq!(v.vocabulary_size, 4);
        assert_eq!(v.candidates[0].entries().len(), 3);
    }

    #[test]
    fn test_all_vectors_share_dimensionality() {
        let v = vectorize(
            "senior rust engineer",
            &["rust", "", "python developer"],
            &opts(FitScope::Joint, NgramRange::Bigram),
        )
        .unwrap();
        assert_eq!(v.reference.dims(), v.vocabulary_size);
        for c in &v.candidates {
            assert_eq!(c.dims(), v.vocabulary_size);
        }
    }

    #[test]
    fn test_weights_are_positive_and_unit_length() {
        let v = vectorize(
            "rust rust engineer distributed",
            &["rust engineer"],
            &opts(FitScope::Joint, NgramRange::Unigram),
        )
        .unwrap();
        assert!(v.reference.entries().iter().all(|&(_, w)| w > 0.0));
        assert!((v.reference.norm() - 1.0).abs() < 1e-12);
        assert!((v.candidates[0].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_candidate_is_zero_vector() {
        let v = vectorize("rust engineer", &[""], &VectorizerOptions::default()).unwrap();
        assert!(v.candidates[0].is_zero());
        assert_eq!(v.candidates[0].norm(), 0.0);
    }

    #[test]
    fn test_smoothed_idf_values() {
        let space = FeatureSpace::fit(&["rust engineer", "rust designer"], NgramRange::Unigram);
        // df(rust) = 2 of n = 2 → ln(3/3) + 1
        assert!((space.idf("rust").unwrap() - 1.0).abs() < 1e-12);
        // df(engineer) = 1 → ln(3/2) + 1
        let expected = (3.0_f64 / 2.0).ln() + 1.0;
        assert!((space.idf("engineer").unwrap() - expected).abs() < 1e-12);
        assert!(space.idf("python").is_none());
    }

    #[test]
    fn test_vocabulary_indices_are_lexicographic() {
        let space = FeatureSpace::fit(&["zeta alpha mid"], NgramRange::Unigram);
        let v = space.transform("zeta");
        assert_eq!(v.entries()[0].0, 2);
        let v = space.transform("alpha");
        assert_eq!(v.entries()[0].0, 0);
    }

    #[test]
    fn test_bigram_features_present() {
        let space = FeatureSpace::fit(&["distributed systems engineer"], NgramRange::Bigram);
        assert!(space.idf("distributed systems").is_some());
        assert!(space.idf("systems engineer").is_some());
        assert_eq!(space.len(), 5);
    }

    #[test]
    fn test_dot_product_merges_sparse_entries() {
        let a = SparseVector {
            dims: 4,
            entries: vec![(0, 1.0), (2, 2.0)],
        };
        let b = SparseVector {
            dims: 4,
            entries: vec![(1, 5.0), (2, 3.0), (3, 1.0)],
        };
        assert_eq!(a.dot(&b), 6.0);
        assert_eq!(a.dot(&SparseVector::zeros(4)), 0.0);
    }

    #[test]
    fn test_fit_scope_from_str() {
        assert_eq!("reference".parse::<FitScope>().unwrap(), FitScope::Reference);
        assert_eq!("JOINT".parse::<FitScope>().unwrap(), FitScope::Joint);
        assert!("global".parse::<FitScope>().is_err());
    }
}
