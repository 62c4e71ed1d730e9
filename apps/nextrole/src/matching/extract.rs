//! Text extraction — turns uploaded files into UTF-8 text for the scoring core.
//!
//! Pluggable via the `TextExtractor` trait. `AppState` holds an `Arc<dyn TextExtractor>`;
//! the default backend only understands plain-text formats.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("File '{0}' is not valid UTF-8 text")]
    InvalidEncoding(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file_name: &str, content: Bytes) -> Result<String, ExtractError>;
}

/// Plain-text backend: `.txt`, `.text`, `.md`.
pub struct PlainTextExtractor;

const PLAIN_TEXT_SUFFIXES: &[&str] = &["txt", "text", "md"];

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, file_name: &str, content: Bytes) -> Result<String, ExtractError> {
        let suffix = suffix(file_name);
        if !PLAIN_TEXT_SUFFIXES.contains(&suffix.as_str()) {
            return Err(ExtractError::UnsupportedFormat(if suffix.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{suffix}")
            }));
        }

        let body = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&content[..]);
        std::str::from_utf8(body)
            .map(str::to_string)
            .map_err(|_| ExtractError::InvalidEncoding(file_name.to_string()))
    }
}

/// Lowercased extension of `file_name`, or an empty string.
fn suffix(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
