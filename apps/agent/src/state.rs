use std::sync::Arc;

use crate::contract::JobBoard;
use crate::identity::IdentityClient;
use crate::llm_client::CompletionModel;
use crate::workflow::Workflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Typed job-board access. Production: `ContractClient<EthersGateway>`.
    pub job_board: Arc<dyn JobBoard>,
    pub llm: Arc<dyn CompletionModel>,
    /// Pipeline over the same job board; its scorer is chosen via ENABLE_LLM_SCORING.
    pub workflow: Arc<Workflow>,
    pub identity: IdentityClient,
}
