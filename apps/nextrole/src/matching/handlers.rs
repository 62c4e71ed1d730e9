//! Axum route handlers for the Matching API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EmptyReference;
use crate::errors::AppError;
use crate::matching::extract::{ExtractError, TextExtractor};
use crate::scoring::{
    score, score_or_zero, Corpus, Document, FitScope, NgramRange, Normalization, ScoreRecord,
    Scored,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub reference_text: String,
    pub candidates: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub run_id: Uuid,
    pub scored_at: DateTime<Utc>,
    pub fit_scope: FitScope,
    pub ngram_range: NgramRange,
    pub normalization: Normalization,
    pub reference_empty: bool,
    /// Uploaded files whose format could not be read; scored as empty text.
    pub skipped: Vec<String>,
    pub results: Vec<ScoreRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Ranks inline candidate texts against a reference text.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if let Some(pos) = request.candidates.iter().position(|c| c.id.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "candidates[{pos}].id cannot be empty"
        )));
    }

    let corpus = Corpus::new(request.reference_text, request.candidates)?;
    let response = run_match(&state, corpus, Vec::new()).await?;
    Ok(Json(response))
}

/// POST /api/v1/match/upload
///
/// Multipart form: one `jd` file and one or more `resumes` files.
/// Resume ids are the uploaded file names.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let mut jd: Option<(String, Bytes)> = None;
    let mut resumes: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;

        // Browsers send an empty part when no file is chosen.
        let no_file = file_name.is_empty() && content.is_empty();
        match name.as_str() {
            "jd" | "resumes" if no_file => {}
            "jd" if jd.is_some() => {
                return Err(AppError::Validation(
                    "Only one job description file may be uploaded".to_string(),
                ));
            }
            "jd" => jd = Some((file_name, content)),
            "resumes" if file_name.trim().is_empty() => {
                return Err(AppError::Validation(format!(
                    "resumes[{}] has no file name",
                    resumes.len()
                )));
            }
            "resumes" => resumes.push((file_name, content)),
            other => debug!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let (jd_name, jd_content) =
        jd.ok_or_else(|| AppError::Validation("Missing job description file".to_string()))?;
    if resumes.is_empty() {
        return Err(AppError::Validation("No resumes uploaded".to_string()));
    }

    let reference_text = state.extractor.extract(&jd_name, jd_content).await?;
    let (candidates, skipped) = extract_all(state.extractor.clone(), resumes).await?;

    let corpus = Corpus::new(reference_text, candidates)?;
    let response = run_match(&state, corpus, skipped).await?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Extracts every uploaded resume concurrently, preserving upload order.
/// Unsupported formats become empty documents and are reported in the skipped list.
async fn extract_all(
    extractor: Arc<dyn TextExtractor>,
    files: Vec<(String, Bytes)>,
) -> Result<(Vec<Document>, Vec<String>), AppError> {
    let count = files.len();
    let mut tasks = JoinSet::new();
    for (idx, (file_name, content)) in files.into_iter().enumerate() {
        let extractor = extractor.clone();
        tasks.spawn(async move {
            let text = extractor.extract(&file_name, content).await;
            (idx, file_name, text)
        });
    }

    let mut slots: Vec<Option<Document>> = vec![None; count];
    let mut skipped = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (idx, file_name, text) = joined.context("Extraction task failed")?;
        let text = match text {
            Ok(text) => text,
            Err(ExtractError::UnsupportedFormat(format)) => {
                warn!("Skipping '{file_name}': unsupported format {format}");
                skipped.push(file_name.clone());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };
        slots[idx] = Some(Document::new(file_name, text));
    }

    let documents = slots.into_iter().flatten().collect();
    Ok((documents, skipped))
}

/// Runs the CPU-bound scoring on the blocking pool and wraps the result with run metadata.
async fn run_match(
    state: &AppState,
    corpus: Corpus,
    mut skipped: Vec<String>,
) -> Result<MatchResponse, AppError> {
    let run_id = Uuid::new_v4();
    let options = state.config.scoring;
    let empty_reference = state.config.empty_reference;
    let candidate_count = corpus.candidates().len();

    let scored: Scored = tokio::task::spawn_blocking(move || match empty_reference {
        EmptyReference::Reject => score(&corpus, &options).map(|records| Scored {
            records,
            reference_empty: false,
        }),
        EmptyReference::Zero => score_or_zero(&corpus, &options),
    })
    .await
    .context("Scoring task failed")??;

    skipped.sort();
    info!(
        %run_id,
        candidates = candidate_count,
        skipped = skipped.len(),
        reference_empty = scored.reference_empty,
        "Match run complete"
    );

    Ok(MatchResponse {
        run_id,
        scored_at: Utc::now(),
        fit_scope: options.fit_scope,
        ngram_range: options.ngram_range,
        normalization: options.normalization,
        reference_empty: scored.reference_empty,
        skipped,
        results: scored.records,
    })
}
