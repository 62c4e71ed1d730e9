//! Tokenizer: lowercase, split on non-word characters, drop short tokens and stopwords.
//!
//! A token is a maximal run of alphanumeric or `_` characters at least two characters long.
//! Bigrams are built from adjacent tokens *after* stopword removal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::stop_words::is_stop_word;
use crate::scoring::ParsePolicyError;

/// Which n-grams become features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NgramRange {
    /// Single words only.
    #[default]
    Unigram,
    /// Single words plus adjacent word pairs.
    Bigram,
}

impl FromStr for NgramRange {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unigram" | "1" => Ok(NgramRange::Unigram),
            "bigram" | "2" => Ok(NgramRange::Bigram),
            other => Err(ParsePolicyError {
                kind: "ngram range",
                value: other.to_string(),
                expected: "unigram, bigram",
            }),
        }
    }
}

/// Splits `text` into lowercased, stopword-filtered word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !is_stop_word(w))
        .map(String::from)
        .collect()
}

/// Produces the feature terms of `text` for the given n-gram range, in document order.
pub fn terms(text: &str, ngram_range: NgramRange) -> Vec<String> {
    let tokens = tokenize(text);
    match ngram_range {
        NgramRange::Unigram => tokens,
        NgramRange::Bigram => {
            let bigrams: Vec<String> = tokens
                .windows(2)
                .map(|pair| format!("{} {}", pair[0], pair[1]))
                .collect();
            let mut all = tokens;
            all.extend(bigrams);
            all
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_stop_words() {
        let tokens = tokenize("The Senior Backend Engineer with Rust");
        assert_eq!(tokens, vec!["senior", "backend", "engineer", "rust"]);
    }

    #[test]
    fn test_tokenize_drops_single_characters() {
        let tokens = tokenize("C and R x programming");
        assert_eq!(tokens, vec!["programming"]);
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_keeps_underscore() {
        let tokens = tokenize("node.js, snake_case; ci/cd");
        assert_eq!(tokens, vec!["node", "js", "snake_case", "ci", "cd"]);
    }

    #[test]
    fn test_tokenize_keeps_digits_and_unicode() {
        let tokens = tokenize("5+ years Zürich k8s");
        assert_eq!(tokens, vec!["years", "zürich", "k8s"]);
    }

    #[test]
    fn test_tokenize_empty_and_stopword_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("the of and with").is_empty());
    }

    #[test]
    fn test_unigram_terms_equal_tokens() {
        assert_eq!(
            terms("distributed systems", NgramRange::Unigram),
            vec!["distributed", "systems"]
        );
    }

    #[test]
    fn test_bigrams_skip_removed_stop_words() {
        let t = terms("backend with distributed systems", NgramRange::Bigram);
        assert_eq!(
            t,
            vec![
                "backend",
                "distributed",
                "systems",
                "backend distributed",
                "distributed systems"
            ]
        );
    }

    #[test]
    fn test_single_token_has_no_bigrams() {
        assert_eq!(terms("rust", NgramRange::Bigram), vec!["rust"]);
    }

    #[test]
    fn test_ngram_range_from_str() {
        assert_eq!("unigram".parse::<NgramRange>().unwrap(), NgramRange::Unigram);
        assert_eq!(" Bigram ".parse::<NgramRange>().unwrap(), NgramRange::Bigram);
        assert_eq!("2".parse::<NgramRange>().unwrap(), NgramRange::Bigram);
        assert!("trigram".parse::<NgramRange>().is_err());
    }
}
