use anyhow::Context;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::export;
use crate::state::AppState;
use crate::store::jobs::JobStatus;

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ExportRequest {
    pub summary: String,
    pub title: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/export",
    tag = "Export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, body = crate::errors::ErrorResponse)
    )
))]
pub async fn export_summary(
    State(state): State<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, AppError> {
    if !state.config.features.pdf_export_enabled {
        return Err(AppError::FeatureDisabled("PDF export".to_string()));
    }

    if payload.summary.trim().is_empty() {
        return Err(AppError::Validation("Summary is empty".to_string()));
    }

    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Digest".to_string());

    render_pdf_response(title, payload.summary).await
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/digests/{id}/export",
    tag = "Export",
    params(("id" = String, Path, description = "Digest job id")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, body = crate::errors::ErrorResponse),
        (status = 409, body = crate::errors::ErrorResponse)
    )
))]
pub async fn export_digest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if !state.config.features.pdf_export_enabled {
        return Err(AppError::FeatureDisabled("PDF export".to_string()));
    }

    let job = state
        .jobs
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound("Digest job not found".to_string()))?;

    if job.status != JobStatus::Completed {
        return Err(AppError::Conflict(format!(
            "Digest job is {}, not completed",
            job.status
        )));
    }

    let summary = job.summary.unwrap_or_default();
    if summary.trim().is_empty() {
        return Err(AppError::Conflict("Digest produced no summary".to_string()));
    }

    render_pdf_response("Digest".to_string(), summary).await
}

async fn render_pdf_response(title: String, summary: String) -> Result<Response, AppError> {
    let bytes =
        tokio::task::spawn_blocking(move || export::render_summary_pdf(&title, &summary))
            .await
            .context("PDF rendering task panicked")
            .map_err(AppError::Internal)??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"digest.pdf\"".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}
