//! Axum route handlers for read-only job-board queries.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Application, Candidate, Job, JobFilters};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub candidate_id: String,
    pub applications: Vec<Application>,
    pub count: usize,
}

/// GET /candidate/:candidate_id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<Candidate>, AppError> {
    state
        .job_board
        .get_candidate(&candidate_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {candidate_id}")))
}

/// GET /candidate/:candidate_id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Json<ApplicationsResponse> {
    let applications = state
        .job_board
        .list_applications_for_candidate(&candidate_id)
        .await;
    Json(ApplicationsResponse {
        candidate_id,
        count: applications.len(),
        applications,
    })
}

/// GET /jobs
///
/// Optional query filters: `location`, `job_type`, `exclude_company`.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Json<JobsResponse> {
    let jobs = state.job_board.list_jobs(&filters).await;
    Json(JobsResponse {
        count: jobs.len(),
        jobs,
    })
}

/// GET /jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, AppError> {
    state
        .job_board
        .get_job(&job_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job not found: {job_id}")))
}
