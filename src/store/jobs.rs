use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One chunked-summarization run. Progress moves strictly forward as the
/// worker finishes chunks in order.
#[derive(Debug, Clone)]
pub struct DigestJob {
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

#[derive(Clone, Default)]
pub struct DigestJobStore {
    inner: Arc<RwLock<HashMap<String, DigestJob>>>,
}

impl DigestJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        document_id: Option<&str>,
        chunks_total: usize,
        warning: Option<String>,
    ) -> DigestJob {
        let job = DigestJob {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.map(|id| id.to_string()),
            status: JobStatus::Pending,
            chunks_total,
            chunks_completed: 0,
            progress: 0.0,
            summary: None,
            warning,
            error_message: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            started_at: None,
            completed_at: None,
        };

        self.inner.write().insert(job.id.clone(), job.clone());
        job
    }

    pub fn find_by_id(&self, id: &str) -> Option<DigestJob> {
        self.inner.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<DigestJob> {
        let mut jobs: Vec<DigestJob> = self.inner.read().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    pub fn mark_running(&self, id: &str) {
        self.update(id, |job| {
            job.status = JobStatus::Running;
            job.started_at = Some(chrono::Utc::now().to_rfc3339());
        });
    }

    pub fn update_progress(&self, id: &str, chunks_completed: usize, progress: f64) {
        self.update(id, |job| {
            job.chunks_completed = chunks_completed;
            job.progress = progress;
        });
    }

    pub fn complete(&self, id: &str, summary: &str) {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.progress = 1.0;
            job.summary = Some(summary.to_string());
            job.completed_at = Some(chrono::Utc::now().to_rfc3339());
        });
    }

    pub fn fail(&self, id: &str, message: &str) {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(message.to_string());
            job.completed_at = Some(chrono::Utc::now().to_rfc3339());
        });
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut DigestJob)) {
        if let Some(job) = self.inner.write().get_mut(id) {
            apply(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_lifecycle() {
        let store = DigestJobStore::new();
        let job = store.create(None, 3, None);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.chunks_total, 3);

        store.mark_running(&job.id);
        store.update_progress(&job.id, 1, 1.0 / 3.0);

        let running = store.find_by_id(&job.id).unwrap();
        assert_eq!(running.status, JobStatus::Running);
        assert_eq!(running.chunks_completed, 1);
        assert!(running.started_at.is_some());

        store.complete(&job.id, "the digest");
        let done = store.find_by_id(&job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.progress, 1.0);
        assert_eq!(done.summary.as_deref(), Some("the digest"));
        assert!(done.completed_at.is_some());
        assert!(done.status.is_terminal());
    }

    #[test]
    fn test_failed_job_keeps_error_and_no_summary() {
        let store = DigestJobStore::new();
        let job = store.create(Some("doc-1"), 2, None);

        store.mark_running(&job.id);
        store.fail(&job.id, "summarization failed on chunk 1 of 2");

        let failed = store.find_by_id(&job.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.document_id.as_deref(), Some("doc-1"));
        assert!(failed.summary.is_none());
        assert!(
            failed
                .error_message
                .as_deref()
                .unwrap()
                .contains("chunk 1")
        );
    }

    #[test]
    fn test_update_on_missing_job_is_noop() {
        let store = DigestJobStore::new();
        store.update_progress("nope", 1, 0.5);
        assert!(store.find_by_id("nope").is_none());
    }
}
