mod config;
mod contract;
mod errors;
mod identity;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::contract::{ContractClient, EthersGateway, JobBoard};
use crate::identity::IdentityClient;
use crate::llm_client::{CompletionModel, LlmClient};
use crate::matching::scoring::{CompatibilityScorer, LlmScorer, SkillOverlapScorer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job agent v{}", env!("CARGO_PKG_VERSION"));

    // Job board contract over JSON-RPC
    let gateway = EthersGateway::connect(
        &config.rpc_url,
        &config.contract_address,
        config.private_key.clone(),
    )?;
    info!(
        "Job board contract {:?} via {}",
        gateway.address(),
        config.rpc_url
    );
    if config.private_key.is_none() {
        info!("PRIVATE_KEY not set; application submission is disabled");
    }
    let job_board: Arc<dyn JobBoard> = Arc::new(ContractClient::new(gateway));

    // Initialize LLM client
    let llm: Arc<dyn CompletionModel> = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Compatibility scorer (LLM by default, skill overlap via ENABLE_LLM_SCORING=false)
    let scorer: Arc<dyn CompatibilityScorer> = if config.enable_llm_scoring {
        Arc::new(LlmScorer::new(llm.clone()))
    } else {
        Arc::new(SkillOverlapScorer)
    };
    info!("LLM compatibility scoring enabled: {}", config.enable_llm_scoring);

    let workflow = Workflow::new(job_board.clone(), scorer, llm.clone());

    let identity = IdentityClient::new(
        config.privy_api_url.clone(),
        config.privy_app_id.clone(),
        config.privy_app_secret.clone(),
    )?;

    // Build app state
    let state = AppState {
        job_board,
        llm,
        workflow: Arc::new(workflow),
        identity,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
