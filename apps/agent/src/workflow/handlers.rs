//! Axum route handlers for job search runs and application submission.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{channel::mpsc, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::matching::scoring::MatchedJob;
use crate::models::Candidate;
use crate::state::AppState;
use crate::workflow::applications::{ApplicationDraft, SubmissionRecord, SubmissionSummary};
use crate::workflow::state::{WorkflowInput, DEFAULT_THRESHOLD};
use crate::workflow::ProgressEvent;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub candidate_id: String,
    pub candidate: Option<Candidate>,
    pub jobs_considered: usize,
    pub matched_jobs_count: usize,
    pub matched_jobs: Vec<MatchedJob>,
    pub applications_ready: usize,
    pub applications: Vec<ApplicationDraft>,
    pub submissions: Vec<SubmissionRecord>,
    pub summary: Option<SubmissionSummary>,
    pub status: &'static str,
}

fn check_threshold(input: &WorkflowInput) -> Result<(), AppError> {
    if input.threshold_is_valid() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "compatibility_threshold must be between 0.0 and 1.0".to_string(),
        ))
    }
}

/// POST /search-jobs
///
/// Runs the whole pipeline and answers once it finishes. A step failure is a 400
/// carrying the step's message.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(input): Json<WorkflowInput>,
) -> Result<Json<SearchResponse>, AppError> {
    check_threshold(&input)?;

    let result = state.workflow.run(input).await;
    if let Some(message) = result.error() {
        return Err(AppError::Workflow(message.to_string()));
    }

    Ok(Json(SearchResponse {
        candidate_id: result.candidate_id,
        candidate: result.candidate,
        jobs_considered: result.jobs.len(),
        matched_jobs_count: result.matched_jobs.len(),
        matched_jobs: result.matched_jobs,
        applications_ready: result.applications.len(),
        applications: result.applications,
        submissions: result.submissions,
        summary: result.summary,
        status: "completed",
    }))
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub compatibility_threshold: Option<f64>,
    pub resume_path: Option<String>,
}

/// GET /search-jobs/:candidate_id/stream
///
/// Starts a run in its own task and relays progress as server-sent events. The
/// run is not cancelled when the client disconnects. Streamed runs never submit;
/// submission stays behind POST.
pub async fn handle_search_stream(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let mut input = WorkflowInput::new(candidate_id);
    input.compatibility_threshold = query.compatibility_threshold.unwrap_or(DEFAULT_THRESHOLD);
    input.resume_path = query.resume_path.filter(|p| !p.trim().is_empty());
    check_threshold(&input)?;

    let (tx, rx) = mpsc::unbounded();
    let workflow = state.workflow.clone();
    tokio::spawn(async move {
        workflow.run_with_progress(input, Some(tx)).await;
    });

    let events = rx.map(|progress: ProgressEvent| {
        let event = Event::default().event(progress.name());
        Ok(match event.json_data(&progress) {
            Ok(event) => event,
            Err(e) => {
                error!("Could not serialize progress event: {e}");
                Event::default().event("error").data("serialization failure")
            }
        })
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub job_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub candidate_id: String,
    pub status: &'static str,
    pub queued: Vec<ApplicationDraft>,
    pub unknown_job_ids: Vec<String>,
}

/// POST /apply-jobs/:candidate_id
///
/// Drafts one application per known job and submits them in a background task.
/// Responds 202 as soon as the drafts are queued; outcomes appear in the logs and
/// on-chain.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    if req.job_ids.is_empty() {
        return Err(AppError::Validation("job_ids must not be empty".to_string()));
    }

    state
        .job_board
        .get_candidate(&candidate_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {candidate_id}")))?;

    let mut drafts = Vec::with_capacity(req.job_ids.len());
    let mut unknown_job_ids = Vec::new();
    for job_id in req.job_ids {
        match state.job_board.get_job(&job_id).await {
            Some(job) => drafts.push(ApplicationDraft::new(&candidate_id, &job, None)),
            None => {
                warn!("Skipping unknown job {job_id} for candidate {candidate_id}");
                unknown_job_ids.push(job_id);
            }
        }
    }

    if drafts.is_empty() {
        return Err(AppError::NotFound("None of the requested jobs exist".to_string()));
    }

    info!("Queued {} applications for candidate {candidate_id}", drafts.len());
    let workflow = state.workflow.clone();
    let queued = drafts.clone();
    tokio::spawn(async move {
        workflow.submit(&drafts).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ApplyResponse {
            candidate_id,
            status: "queued",
            queued,
            unknown_job_ids,
        }),
    ))
}
