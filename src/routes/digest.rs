use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;

use crate::dto::digest::DigestJobResponse;
use crate::errors::AppError;
use crate::services::chunking;
use crate::services::inference::InferenceClient;
use crate::state::AppState;
use crate::store::jobs::DigestJobStore;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StartDigestRequest {
    /// Pasted text; takes precedence over `document_id`.
    pub text: Option<String>,
    /// Id of a previously uploaded document.
    pub document_id: Option<String>,
    pub max_chunk_words: Option<usize>,
    pub min_summary_tokens: Option<usize>,
    pub max_summary_tokens: Option<usize>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/digests",
    tag = "Digests",
    request_body = StartDigestRequest,
    responses(
        (status = 200, body = DigestJobResponse),
        (status = 400, body = crate::errors::ErrorResponse)
    )
))]
pub async fn start_digest(
    State(state): State<AppState>,
    Json(payload): Json<StartDigestRequest>,
) -> Result<Json<DigestJobResponse>, AppError> {
    let (text, document_id) =
        resolve_text(&state, payload.text.as_deref(), payload.document_id.as_deref())?;

    let max_chunk_words = payload
        .max_chunk_words
        .unwrap_or(state.config.digest.max_chunk_words);
    if max_chunk_words == 0 {
        return Err(AppError::Validation(
            "max_chunk_words must be positive".to_string(),
        ));
    }

    let min_tokens = payload
        .min_summary_tokens
        .unwrap_or(state.config.digest.min_summary_tokens);
    let max_tokens = payload
        .max_summary_tokens
        .unwrap_or(state.config.digest.max_summary_tokens);
    if min_tokens == 0 || max_tokens < min_tokens {
        return Err(AppError::Validation(
            "Summary length targets must be positive, with min <= max".to_string(),
        ));
    }

    let word_count = chunking::word_count(&text);
    if word_count == 0 {
        return Err(AppError::Validation(
            "No text to summarize. Paste text or upload a document first.".to_string(),
        ));
    }

    // Advisory only — large inputs are accepted, they just take a while.
    let warning = (word_count > state.config.digest.soft_word_limit).then(|| {
        format!("Input is {word_count} words; summarization may take several minutes")
    });
    if let Some(warning) = &warning {
        tracing::warn!("{warning}");
    }

    let chunks = chunking::chunk_words(&text, max_chunk_words);
    let job = state
        .jobs
        .create(document_id.as_deref(), chunks.len(), warning);

    tracing::info!(
        "Digest job {} started: {} words in {} chunks",
        job.id,
        word_count,
        chunks.len()
    );

    let jobs = state.jobs.clone();
    let inference = state.inference.clone();
    let job_id = job.id.clone();

    tokio::spawn(async move {
        run_digest(jobs, inference, job_id, chunks, min_tokens, max_tokens).await;
    });

    Ok(Json(job.into()))
}

/// The chunk loop runs off the request path; clients watch progress via
/// the job resource or its SSE stream. The loop itself is strictly
/// sequential — the final join is order-sensitive.
async fn run_digest(
    jobs: DigestJobStore,
    inference: Arc<InferenceClient>,
    job_id: String,
    chunks: Vec<String>,
    min_length: usize,
    max_length: usize,
) {
    jobs.mark_running(&job_id);

    let mut completed = 0usize;
    let result = chunking::summarize_chunks(
        &chunks,
        async move |chunk| inference.summarize(chunk, min_length, max_length).await,
        |fraction| {
            completed += 1;
            jobs.update_progress(&job_id, completed, fraction);
        },
    )
    .await;

    match result {
        Ok(summary) => {
            jobs.complete(&job_id, &summary);
            tracing::info!("Digest job {job_id} completed ({} chunks)", chunks.len());
        }
        Err(e) => {
            let msg = format!("{:#}", anyhow::Error::from(e));
            jobs.fail(&job_id, &msg);
            tracing::error!("Digest job {job_id} failed: {msg}");
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/digests",
    tag = "Digests",
    responses((status = 200, body = [DigestJobResponse]))
))]
pub async fn list_digests(
    State(state): State<AppState>,
) -> Result<Json<Vec<DigestJobResponse>>, AppError> {
    let jobs = state.jobs.list();
    Ok(Json(jobs.into_iter().map(|j| j.into()).collect()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/digests/{id}",
    tag = "Digests",
    params(("id" = String, Path, description = "Digest job id")),
    responses(
        (status = 200, body = DigestJobResponse),
        (status = 404, body = crate::errors::ErrorResponse)
    )
))]
pub async fn get_digest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DigestJobResponse>, AppError> {
    let job = state
        .jobs
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound("Digest job not found".to_string()))?;

    Ok(Json(job.into()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/digests/{id}/events",
    tag = "Digests",
    params(("id" = String, Path, description = "Digest job id")),
    responses((status = 200, description = "SSE stream of digest job snapshots"))
))]
pub async fn digest_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.jobs.find_by_id(&id).is_none() {
        return Err(AppError::NotFound("Digest job not found".to_string()));
    }

    let jobs = state.jobs.clone();

    // Emit a snapshot per poll tick until the job reaches a terminal state.
    let snapshots = futures::stream::unfold(
        (jobs, id, true, false),
        |(jobs, id, first, finished)| async move {
            if finished {
                return None;
            }
            if !first {
                tokio::time::sleep(EVENT_POLL_INTERVAL).await;
            }

            let job = jobs.find_by_id(&id)?;
            let done = job.status.is_terminal();

            let payload =
                serde_json::to_string(&DigestJobResponse::from(job)).unwrap_or_default();
            let event = Event::default().event("progress").data(payload);

            Some((Ok(event), (jobs, id, false, done)))
        },
    );

    let stream = snapshots.chain(tokio_stream::once(Ok(Event::default().data("[DONE]"))));

    Ok(Sse::new(stream))
}

/// Resolve the source text for digest/classify calls: inline text wins,
/// then a stored document's extracted text.
pub(crate) fn resolve_text(
    state: &AppState,
    text: Option<&str>,
    document_id: Option<&str>,
) -> Result<(String, Option<String>), AppError> {
    if let Some(text) = text
        && !text.trim().is_empty()
    {
        return Ok((text.to_string(), None));
    }

    if let Some(id) = document_id {
        let doc = state
            .documents
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;
        return Ok((doc.text, Some(doc.id)));
    }

    Err(AppError::Validation(
        "Provide text or a document_id".to_string(),
    ))
}
