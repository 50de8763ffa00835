use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::dto::digest::ClassificationResponse;
use crate::errors::AppError;
use crate::routes::digest::resolve_text;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassifyRequest {
    /// Pasted text; takes precedence over `document_id`.
    pub text: Option<String>,
    /// Id of a previously uploaded document.
    pub document_id: Option<String>,
    /// Candidate labels; defaults to the configured label set.
    pub labels: Option<Vec<String>>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/classify",
    tag = "Classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, body = ClassificationResponse),
        (status = 400, body = crate::errors::ErrorResponse)
    )
))]
pub async fn classify(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassificationResponse>, AppError> {
    let (text, _document_id) =
        resolve_text(&state, payload.text.as_deref(), payload.document_id.as_deref())?;

    if text.split_whitespace().next().is_none() {
        return Err(AppError::Validation(
            "No text to classify. Paste text or upload a document first.".to_string(),
        ));
    }

    let labels = payload
        .labels
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| state.config.classify.default_labels.clone());

    // The model only needs the opening of the document to pick a topic.
    let head = truncate_chars(&text, state.config.classify.head_chars);

    let classification = state
        .inference
        .classify(head, &labels)
        .await
        .map_err(AppError::Internal)?;

    let top_label = classification
        .labels
        .first()
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Classification returned no labels")))?;
    let top_score = classification.scores.first().copied().unwrap_or(0.0);

    Ok(Json(ClassificationResponse {
        top_label,
        top_score,
        labels: classification.labels,
        scores: classification.scores,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/labels",
    tag = "Classify",
    responses((status = 200, body = LabelsResponse))
))]
pub async fn list_labels(State(state): State<AppState>) -> Json<LabelsResponse> {
    Json(LabelsResponse {
        labels: state.config.classify.default_labels.clone(),
    })
}

/// Truncate to at most `max_chars` characters on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 4), "héll");
    }

    #[test]
    fn test_truncate_empty() {
        assert_eq!(truncate_chars("", 800), "");
    }
}
