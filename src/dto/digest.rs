use serde::Serialize;

use crate::store::jobs::{DigestJob, JobStatus};

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DigestJobResponse {
    pub id: String,
    pub document_id: Option<String>,
    pub status: JobStatus,
    pub chunks_total: usize,
    pub chunks_completed: usize,
    pub progress: f64,
    pub summary: Option<String>,
    pub warning: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<DigestJob> for DigestJobResponse {
    fn from(job: DigestJob) -> Self {
        Self {
            id: job.id,
            document_id: job.document_id,
            status: job.status,
            chunks_total: job.chunks_total,
            chunks_completed: job.chunks_completed,
            progress: job.progress,
            summary: job.summary,
            warning: job.warning,
            error_message: job.error_message,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

/// Labels and scores are aligned by index, ordered by descending score.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassificationResponse {
    pub top_label: String,
    pub top_score: f64,
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}
