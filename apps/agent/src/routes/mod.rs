pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::contract::handlers as contract;
use crate::identity::handlers as identity;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::workflow::handlers as workflow;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Job search pipeline
        .route("/search-jobs", post(workflow::handle_search))
        .route(
            "/search-jobs/:candidate_id/stream",
            get(workflow::handle_search_stream),
        )
        .route("/apply-jobs/:candidate_id", post(workflow::handle_apply))
        // Job board reads
        .route(
            "/candidate/:candidate_id/profile",
            get(contract::handle_get_profile),
        )
        .route(
            "/candidate/:candidate_id/applications",
            get(contract::handle_list_applications),
        )
        .route("/jobs", get(contract::handle_list_jobs))
        .route("/jobs/:job_id", get(contract::handle_get_job))
        // Resume intake
        .route("/resume/extract", post(resume::handle_extract))
        // Identity provider
        .route("/set-user-metadata", post(identity::handle_set_user_metadata))
        .with_state(state)
}
