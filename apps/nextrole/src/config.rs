use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scoring::{FitScope, NgramRange, Normalization, ScoringOptions};

/// What the HTTP layer does when the job description has no usable terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReference {
    /// 422 with a user-facing message.
    #[default]
    Reject,
    /// Score every candidate 0 and flag the response.
    Zero,
}

impl FromStr for EmptyReference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(EmptyReference::Reject),
            "zero" => Ok(EmptyReference::Zero),
            other => anyhow::bail!("unknown empty reference policy '{other}', expected one of: reject, zero"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if any variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub scoring: ScoringOptions,
    pub empty_reference: EmptyReference,
    pub max_upload_bytes: usize,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scoring: ScoringOptions {
                fit_scope: parse_env("FIT_SCOPE", FitScope::default())?,
                ngram_range: parse_env("NGRAM_RANGE", NgramRange::default())?,
                normalization: parse_env("NORMALIZATION", Normalization::default())?,
            },
            empty_reference: parse_env("EMPTY_REFERENCE", EmptyReference::default())?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            scoring: ScoringOptions::default(),
            empty_reference: EmptyReference::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reference_unigram_fixed() {
        let config = Config::default();
        assert_eq!(config.scoring.fit_scope, FitScope::Reference);
        assert_eq!(config.scoring.ngram_range, NgramRange::Unigram);
        assert_eq!(config.scoring.normalization, Normalization::Fixed);
        assert_eq!(config.empty_reference, EmptyReference::Reject);
    }

    #[test]
    fn test_parse_value_policies() {
        let scope: FitScope = parse_value("FIT_SCOPE", "joint").unwrap();
        assert_eq!(scope, FitScope::Joint);
        let port: u16 = parse_value("PORT", " 9000 ").unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_parse_value_error_names_variable() {
        let err = parse_value::<Normalization>("NORMALIZATION", "softmax").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("NORMALIZATION"), "{msg}");
        assert!(msg.contains("softmax"), "{msg}");
    }

    #[test]
    fn test_empty_reference_from_str() {
        assert_eq!("zero".parse::<EmptyReference>().unwrap(), EmptyReference::Zero);
        assert!("ignore".parse::<EmptyReference>().is_err());
    }
}
