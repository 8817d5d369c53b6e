//! Axum route handlers for the Claims API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::claim::{ClaimStatus, ClaimSummary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Used instead of the stored notes when non-empty.
    #[serde(default)]
    pub notes_override: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/claims/:id
pub async fn handle_get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimStatus>, AppError> {
    info!(claim_id = %id, "Getting claim status");
    let claim = find_claim(&state, &id).await?;
    Ok(Json(claim))
}

/// POST /api/claims/:id/summarize
///
/// Summarizes the claim notes: the request's `notesOverride` when given,
/// otherwise the notes object referenced by the claim's `notesKey`.
///
/// The body is optional. A blank body or one not sent as JSON means no override;
/// a JSON body that does not parse is rejected with 400.
pub async fn handle_summarize_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ClaimSummary>, AppError> {
    let request = parse_summarize_body(&headers, &body)?;

    info!(claim_id = %id, "Generating summary for claim");
    let claim = find_claim(&state, &id).await?;

    let notes_override = request.notes_override;
    let claim_notes = match notes_override.filter(|n| !n.is_empty()) {
        Some(notes) => {
            info!(claim_id = %id, "Using provided claim notes");
            notes
        }
        None => {
            state
                .notes
                .get_claim_notes(&state.config.notes_bucket, &claim.notes_key)
                .await?
        }
    };

    let summary = state.summarizer.generate_summary(&id, &claim_notes).await?;
    Ok(Json(summary))
}

/// PUT /api/claims/:id
///
/// Creates or replaces the claim record. The path ID wins over any `id` in the body.
pub async fn handle_put_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut claim): Json<ClaimStatus>,
) -> Result<StatusCode, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::Validation("claim id cannot be empty".to_string()));
    }
    claim.id = id;
    state.claims.save_claim_status(&claim).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/claims/:id/notes
///
/// Stores plain-text notes for an existing claim and points the claim at them.
pub async fn handle_put_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<StatusCode, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("notes cannot be empty".to_string()));
    }

    let mut claim = find_claim(&state, &id).await?;
    let key = if claim.notes_key.is_empty() {
        default_notes_key(&id)
    } else {
        claim.notes_key.clone()
    };

    state
        .notes
        .save_claim_notes(&state.config.notes_bucket, &key, &body)
        .await?;

    if claim.notes_key != key {
        claim.notes_key = key.clone();
        if let Err(e) = state.claims.save_claim_status(&claim).await {
            warn!(
                claim_id = %id,
                bucket = %state.config.notes_bucket,
                key = %key,
                error = %e,
                "Notes saved but claim record not updated with notes key"
            );
            return Err(e.into());
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

fn parse_summarize_body(headers: &HeaderMap, body: &Bytes) -> Result<SummarizeRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) || !has_json_content_type(headers) {
        return Ok(SummarizeRequest::default());
    }

    Json::<SummarizeRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|e| {
            AppError::Validation(format!("invalid summarize request body: {}", e.body_text()))
        })
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

async fn find_claim(state: &AppState, id: &str) -> Result<ClaimStatus, AppError> {
    state
        .claims
        .get_claim_status(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Claim {id} not found")))
}

fn default_notes_key(claim_id: &str) -> String {
    format!("claims/{claim_id}/notes.txt")
}
