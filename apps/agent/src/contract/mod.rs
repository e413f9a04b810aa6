//! Job-board smart contract access.
//!
//! Two seams: `ChainGateway` is the raw RPC surface (token-level calls, balance,
//! gas, broadcast, receipts) and `JobBoard` is the typed surface the workflow and
//! handlers use. `ContractClient` turns the former into the latter.

use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256, U256};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Application, Candidate, Job, JobFilters};

pub mod abi;
pub mod client;
pub mod decode;
pub mod gateway;
pub mod handlers;

pub use client::ContractClient;
pub use gateway::EthersGateway;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("unexpected return data: {0}")]
    Decode(String),

    #[error("contract call reverted: {0}")]
    Reverted(String),

    #[error("PRIVATE_KEY is not configured")]
    MissingKey,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

impl ContractError {
    /// Only transport failures (timeouts, dropped connections, node hiccups) can
    /// succeed unchanged on a later attempt. Nothing retries automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContractError::Transport(_))
    }
}

/// A state-changing contract call ready to be signed.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub function: &'static str,
    pub args: Vec<Token>,
    pub gas: U256,
    pub gas_price: U256,
}

/// The parts of a transaction receipt the agent cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptSummary {
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    pub submission_event: bool,
}

/// Raw RPC surface of the job-board contract.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Read-only call; returns the single (possibly tuple/array) output token.
    async fn call(&self, function: &'static str, args: Vec<Token>) -> Result<Token, ContractError>;

    /// Address of the configured signing key.
    fn signer_address(&self) -> Result<Address, ContractError>;

    async fn balance(&self, account: Address) -> Result<U256, ContractError>;

    async fn gas_price(&self) -> Result<U256, ContractError>;

    async fn estimate_gas(
        &self,
        function: &'static str,
        args: Vec<Token>,
        from: Address,
    ) -> Result<U256, ContractError>;

    /// Signs and broadcasts; returns the transaction hash.
    async fn send(&self, call: PreparedCall) -> Result<H256, ContractError>;

    /// Waits up to `timeout` for the receipt. `Ok(None)` means the wait timed out.
    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout: Duration,
    ) -> Result<Option<ReceiptSummary>, ContractError>;
}

/// Why a submission was never broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    MissingKey,
    InvalidKey { detail: String },
    ZeroBalance,
    InsufficientFunds { required: String, available: String },
    Rpc { detail: String, retryable: bool },
}

/// Result of one `submitApplication` attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Confirmed {
        tx_hash: String,
        block_number: Option<u64>,
        gas_used: Option<String>,
    },
    /// Mined with a failing status.
    Reverted { tx_hash: String },
    /// Broadcast, but no receipt was observed. The transaction may still land.
    Unconfirmed { tx_hash: String, reason: String },
    /// Never broadcast.
    Rejected { reason: Rejection },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Confirmed { .. })
    }

    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, SubmissionOutcome::Unconfirmed { .. })
    }
}

/// Typed access to the job board. Read failures are logged and surface as empty/absent.
#[async_trait]
pub trait JobBoard: Send + Sync {
    async fn list_jobs(&self, filters: &JobFilters) -> Vec<Job>;

    async fn get_job(&self, job_id: &str) -> Option<Job>;

    async fn get_candidate(&self, candidate_id: &str) -> Option<Candidate>;

    async fn list_applications_for_candidate(&self, candidate_id: &str) -> Vec<Application>;

    async fn submit_application(&self, application: &Application) -> SubmissionOutcome;
}
