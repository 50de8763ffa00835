use utoipa::OpenApi;

use crate::dto::digest::{ClassificationResponse, DigestJobResponse};
use crate::dto::document::DocumentResponse;
use crate::errors::ErrorResponse;
use crate::routes::classify::{ClassifyRequest, LabelsResponse};
use crate::routes::digest::StartDigestRequest;
use crate::routes::export::ExportRequest;
use crate::routes::health::HealthResponse;
use crate::store::jobs::JobStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Paper Digest API",
        version = "0.1.0",
        description = "Paper Digest backend — chunked summarization, zero-shot topic classification, and PDF export for pasted or uploaded research text."
    ),
    paths(
        // Health
        crate::routes::health::health_check,
        // Documents
        crate::routes::documents::upload,
        crate::routes::documents::list,
        crate::routes::documents::get_document,
        crate::routes::documents::delete_document,
        // Digests
        crate::routes::digest::start_digest,
        crate::routes::digest::list_digests,
        crate::routes::digest::get_digest,
        crate::routes::digest::digest_events,
        // Classify
        crate::routes::classify::classify,
        crate::routes::classify::list_labels,
        // Export
        crate::routes::export::export_summary,
        crate::routes::export::export_digest,
    ),
    components(
        schemas(
            HealthResponse,
            DocumentResponse,
            DigestJobResponse, JobStatus, StartDigestRequest,
            ClassificationResponse, ClassifyRequest, LabelsResponse,
            ExportRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Documents", description = "Upload and manage extracted documents"),
        (name = "Digests", description = "Chunked summarization jobs"),
        (name = "Classify", description = "Zero-shot topic classification"),
        (name = "Export", description = "PDF export of digests"),
    )
)]
pub struct ApiDoc;
