use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::dto::document::DocumentResponse;
use crate::errors::AppError;
use crate::services::extract;
use crate::state::AppState;

const MAX_FILE_SIZE: usize = 25 * 1024 * 1024; // 25 MB

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    responses(
        (status = 200, body = DocumentResponse),
        (status = 400, body = crate::errors::ErrorResponse)
    )
))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>, AppError> {
    if !state.config.features.pdf_upload_enabled {
        return Err(AppError::FeatureDisabled("PDF upload".to_string()));
    }

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart data: {e}")))?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let original_filename = field.file_name().unwrap_or("document.pdf").to_string();

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if !extract::is_supported(&content_type, &original_filename) {
        return Err(AppError::Validation(format!(
            "Unsupported file type: {content_type}"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {} MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    // A failed or empty extraction degrades to an empty document; digest
    // and classify reject empty text before touching the models.
    let text = match extract::extract_text(&data, &content_type, &original_filename).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Extraction failed for '{original_filename}', storing empty text: {e:#}");
            String::new()
        }
    };

    let doc = state
        .documents
        .create(&original_filename, &content_type, data.len() as i64, text);

    tracing::info!(
        "Document {} uploaded ({} bytes, {} words)",
        doc.id,
        doc.size_bytes,
        doc.word_count
    );

    Ok(Json(doc.into()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    responses((status = 200, body = [DocumentResponse]))
))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let docs = state.documents.list();
    Ok(Json(docs.into_iter().map(|d| d.into()).collect()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, body = DocumentResponse),
        (status = 404, body = crate::errors::ErrorResponse)
    )
))]
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let doc = state
        .documents
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(doc.into()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, body = crate::errors::ErrorResponse)
    )
))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(), AppError> {
    if !state.documents.delete(&id) {
        return Err(AppError::NotFound("Document not found".to_string()));
    }
    Ok(())
}
