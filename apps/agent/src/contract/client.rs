//! Typed job-board client over a `ChainGateway`.
//!
//! Reads swallow failures: they are logged and surface as an empty list or `None`.
//! Submissions return a `SubmissionOutcome` describing exactly how far they got.

use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::U256;
use ethers::utils::format_ether;
use tracing::{error, info, warn};

use crate::contract::abi::{
    GET_ALL_APPLICATIONS, GET_ALL_JOBS, GET_CANDIDATE, GET_JOB, SUBMIT_APPLICATION,
};
use crate::contract::decode::{decode_application, decode_candidate, decode_job, decode_list};
use crate::contract::{
    ChainGateway, ContractError, JobBoard, PreparedCall, Rejection, SubmissionOutcome,
};
use crate::models::{Application, Candidate, Job, JobFilters};

/// Used when `eth_estimateGas` fails.
pub const DEFAULT_GAS_ESTIMATE: u64 = 300_000;
/// Added on top of the estimate when building the transaction.
pub const GAS_BUFFER: u64 = 50_000;
/// Upper bound on waiting for a receipt after broadcast.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct ContractClient<G> {
    gateway: G,
    receipt_timeout: Duration,
}

impl<G: ChainGateway> ContractClient<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            receipt_timeout: RECEIPT_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, ContractError> {
        let token = self.gateway.call(GET_ALL_JOBS, vec![]).await?;
        decode_list(token, decode_job)
    }

    pub async fn fetch_job(&self, job_id: &str) -> Result<Job, ContractError> {
        let token = self
            .gateway
            .call(GET_JOB, vec![Token::String(job_id.to_string())])
            .await?;
        decode_job(token)
    }

    pub async fn fetch_candidate(&self, candidate_id: &str) -> Result<Candidate, ContractError> {
        let token = self
            .gateway
            .call(GET_CANDIDATE, vec![Token::String(candidate_id.to_string())])
            .await?;
        decode_candidate(token)
    }

    pub async fn fetch_applications(&self) -> Result<Vec<Application>, ContractError> {
        let token = self.gateway.call(GET_ALL_APPLICATIONS, vec![]).await?;
        decode_list(token, decode_application)
    }

    async fn try_submit(&self, application: &Application) -> SubmissionOutcome {
        let account = match self.gateway.signer_address() {
            Ok(account) => account,
            Err(ContractError::MissingKey) => {
                error!("PRIVATE_KEY not found in environment variables");
                return rejected(Rejection::MissingKey);
            }
            Err(e) => {
                error!("Signing key unusable: {e}");
                return rejected(Rejection::InvalidKey {
                    detail: e.to_string(),
                });
            }
        };
        info!("Using wallet address: {account:?}");

        let balance = match self.gateway.balance(account).await {
            Ok(balance) => balance,
            Err(e) => return rpc_rejection("balance lookup", e),
        };
        info!("Wallet balance: {}", format_ether(balance));
        if balance.is_zero() {
            error!("Wallet has no balance for gas fees");
            return rejected(Rejection::ZeroBalance);
        }

        let args = vec![
            Token::String(application.application_id.clone()),
            Token::String(application.job_id.clone()),
            Token::String(application.candidate_id.clone()),
            Token::String(application.application_date.clone()),
        ];

        let gas_estimate = match self
            .gateway
            .estimate_gas(SUBMIT_APPLICATION, args.clone(), account)
            .await
        {
            Ok(gas) => gas,
            Err(e) => {
                warn!("Gas estimation failed, using default {DEFAULT_GAS_ESTIMATE}: {e}");
                U256::from(DEFAULT_GAS_ESTIMATE)
            }
        };

        let gas_price = match self.gateway.gas_price().await {
            Ok(price) => price,
            Err(e) => return rpc_rejection("gas price lookup", e),
        };

        let required = gas_estimate.saturating_mul(gas_price);
        if balance < required {
            error!(
                "Insufficient balance for transaction. Need: {}, Have: {}",
                format_ether(required),
                format_ether(balance)
            );
            return rejected(Rejection::InsufficientFunds {
                required: format_ether(required),
                available: format_ether(balance),
            });
        }

        info!(
            "Submitting application {} for job {} by candidate {}",
            application.application_id, application.job_id, application.candidate_id
        );
        let tx_hash = match self
            .gateway
            .send(PreparedCall {
                function: SUBMIT_APPLICATION,
                args,
                gas: gas_estimate.saturating_add(U256::from(GAS_BUFFER)),
                gas_price,
            })
            .await
        {
            Ok(hash) => hash,
            Err(e) => return rpc_rejection("broadcast", e),
        };
        let tx_hash_hex = format!("{tx_hash:?}");
        info!("Transaction sent with hash: {tx_hash_hex}");

        match self
            .gateway
            .wait_for_receipt(tx_hash, self.receipt_timeout)
            .await
        {
            Ok(Some(receipt)) if receipt.success => {
                info!(
                    "Application {} confirmed in block {:?} (gas used {:?}, event emitted: {})",
                    application.application_id,
                    receipt.block_number,
                    receipt.gas_used,
                    receipt.submission_event
                );
                SubmissionOutcome::Confirmed {
                    tx_hash: tx_hash_hex,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used.map(|g| g.to_string()),
                }
            }
            Ok(Some(_)) => {
                error!("Transaction {tx_hash_hex} failed on-chain");
                SubmissionOutcome::Reverted {
                    tx_hash: tx_hash_hex,
                }
            }
            Ok(None) => {
                error!("No receipt for {tx_hash_hex} within {:?}", self.receipt_timeout);
                SubmissionOutcome::Unconfirmed {
                    tx_hash: tx_hash_hex,
                    reason: format!("no receipt within {}s", self.receipt_timeout.as_secs()),
                }
            }
            Err(e) => {
                error!("Error waiting for receipt of {tx_hash_hex}: {e}");
                SubmissionOutcome::Unconfirmed {
                    tx_hash: tx_hash_hex,
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn rejected(reason: Rejection) -> SubmissionOutcome {
    SubmissionOutcome::Rejected { reason }
}

fn rpc_rejection(stage: &str, e: ContractError) -> SubmissionOutcome {
    error!("Submission aborted during {stage}: {e}");
    rejected(Rejection::Rpc {
        detail: format!("{stage}: {e}"),
        retryable: e.is_retryable(),
    })
}

#[async_trait]
impl<G: ChainGateway> JobBoard for ContractClient<G> {
    async fn list_jobs(&self, filters: &JobFilters) -> Vec<Job> {
        match self.fetch_jobs().await {
            Ok(jobs) => {
                let jobs: Vec<Job> = jobs.into_iter().filter(|j| filters.matches(j)).collect();
                info!("Fetched {} jobs from contract", jobs.len());
                jobs
            }
            Err(e) => {
                error!(retryable = e.is_retryable(), "Error fetching jobs from contract: {e}");
                Vec::new()
            }
        }
    }

    async fn get_job(&self, job_id: &str) -> Option<Job> {
        match self.fetch_job(job_id).await {
            // Unknown ids come back as a zeroed record.
            Ok(job) if job.job_id.is_empty() => {
                info!("Job {job_id} is not on the contract");
                None
            }
            Ok(job) => Some(job),
            Err(e) => {
                error!("Error fetching job {job_id} from contract: {e}");
                None
            }
        }
    }

    async fn get_candidate(&self, candidate_id: &str) -> Option<Candidate> {
        match self.fetch_candidate(candidate_id).await {
            Ok(candidate) if candidate.candidate_id.is_empty() => {
                info!("Candidate {candidate_id} is not on the contract");
                None
            }
            Ok(candidate) => {
                info!("Fetched candidate {candidate_id} from contract");
                Some(candidate)
            }
            Err(e) => {
                error!("Error fetching candidate {candidate_id} from contract: {e}");
                None
            }
        }
    }

    async fn list_applications_for_candidate(&self, candidate_id: &str) -> Vec<Application> {
        match self.fetch_applications().await {
            Ok(all) => {
                let mine: Vec<Application> = all
                    .into_iter()
                    .filter(|a| a.candidate_id == candidate_id)
                    .collect();
                info!(
                    "Fetched {} applications for candidate {candidate_id}",
                    mine.len()
                );
                mine
            }
            Err(e) => {
                error!("Error fetching applications for candidate {candidate_id}: {e}");
                Vec::new()
            }
        }
    }

    async fn submit_application(&self, application: &Application) -> SubmissionOutcome {
        self.try_submit(application).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use ethers::types::{Address, H256};

    use super::*;
    use crate::contract::decode::fixtures::{application_token, candidate_token, job_token};
    use crate::contract::ReceiptSummary;
    use crate::models::{ApplicationStatus, Location};

    /// Gateway with canned answers; records what was broadcast.
    struct FakeGateway {
        read: Option<Token>,
        key: Result<Address, fn() -> ContractError>,
        balance: U256,
        gas_estimate: Option<U256>,
        gas_price: U256,
        receipt: Result<Option<ReceiptSummary>, fn() -> ContractError>,
        sends: AtomicUsize,
        sent_gas: Mutex<Option<U256>>,
    }

    impl FakeGateway {
        fn funded() -> Self {
            Self {
                read: None,
                key: Ok(Address::repeat_byte(0x11)),
                balance: U256::exp10(18),
                gas_estimate: Some(U256::from(100_000u64)),
                gas_price: U256::from(1_000_000_000u64),
                receipt: Ok(Some(ReceiptSummary {
                    success: true,
                    block_number: Some(42),
                    gas_used: Some(U256::from(90_000u64)),
                    submission_event: true,
                })),
                sends: AtomicUsize::new(0),
                sent_gas: Mutex::new(None),
            }
        }

        fn reading(token: Token) -> Self {
            Self {
                read: Some(token),
                ..Self::funded()
            }
        }

        fn sends(&self) -> usize {
            self.sends.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainGateway for FakeGateway {
        async fn call(&self, _function: &'static str, _args: Vec<Token>) -> Result<Token, ContractError> {
            self.read
                .clone()
                .ok_or_else(|| ContractError::Transport("connection refused".to_string()))
        }

        fn signer_address(&self) -> Result<Address, ContractError> {
            self.key.map_err(|make| make())
        }

        async fn balance(&self, _account: Address) -> Result<U256, ContractError> {
            Ok(self.balance)
        }

        async fn gas_price(&self) -> Result<U256, ContractError> {
            Ok(self.gas_price)
        }

        async fn estimate_gas(
            &self,
            _function: &'static str,
            _args: Vec<Token>,
            _from: Address,
        ) -> Result<U256, ContractError> {
            self.gas_estimate
                .ok_or_else(|| ContractError::Reverted("execution reverted".to_string()))
        }

        async fn send(&self, call: PreparedCall) -> Result<H256, ContractError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            *self.sent_gas.lock().unwrap() = Some(call.gas);
            Ok(H256::repeat_byte(0xab))
        }

        async fn wait_for_receipt(
            &self,
            _tx_hash: H256,
            _timeout: Duration,
        ) -> Result<Option<ReceiptSummary>, ContractError> {
            self.receipt.clone().map_err(|make| make())
        }
    }

    fn application() -> Application {
        Application {
            application_id: "app-1".to_string(),
            job_id: "job-1".to_string(),
            candidate_id: "cand-1".to_string(),
            application_date: "2024-01-15T00:00:00Z".to_string(),
            status: ApplicationStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_list_jobs_rpc_failure_returns_empty() {
        let client = ContractClient::new(FakeGateway::funded());
        assert!(client.list_jobs(&JobFilters::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_jobs_applies_filters() {
        let token = Token::Array(vec![
            job_token("job-1", "acme", &["Rust"], 0, 0),
            job_token("job-2", "globex", &["Go"], 2, 0),
            job_token("job-3", "initech", &["SQL"], 0, 1),
        ]);
        let client = ContractClient::new(FakeGateway::reading(token));
        let filters = JobFilters {
            location: Some("remote".to_string()),
            exclude_company: Some("acme".to_string()),
            ..Default::default()
        };
        let jobs = client.list_jobs(&filters).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "job-3");
        assert_eq!(jobs[0].location, Location::Remote);
    }

    #[tokio::test]
    async fn test_list_jobs_decode_failure_returns_empty() {
        let client = ContractClient::new(FakeGateway::reading(Token::Bool(true)));
        assert!(client.list_jobs(&JobFilters::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_candidate_failure_is_absent() {
        let client = ContractClient::new(FakeGateway::funded());
        assert!(client.get_candidate("cand-1").await.is_none());
        assert!(client.get_job("job-1").await.is_none());
    }

    #[tokio::test]
    async fn test_zeroed_record_is_absent() {
        let client = ContractClient::new(FakeGateway::reading(candidate_token("", &[])));
        assert!(client.get_candidate("cand-404").await.is_none());

        let client = ContractClient::new(FakeGateway::reading(job_token("", "", &[], 0, 0)));
        assert!(client.get_job("job-404").await.is_none());
    }

    #[tokio::test]
    async fn test_get_candidate_decodes() {
        let client = ContractClient::new(FakeGateway::reading(candidate_token("cand-1", &["Rust"])));
        let candidate = client.get_candidate("cand-1").await.unwrap();
        assert_eq!(candidate.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_applications_filtered_by_candidate() {
        let token = Token::Array(vec![
            application_token("app-1", "job-1", "cand-1", 0),
            application_token("app-2", "job-2", "cand-2", 1),
            application_token("app-3", "job-3", "cand-1", 3),
        ]);
        let client = ContractClient::new(FakeGateway::reading(token));
        let apps = client.list_applications_for_candidate("cand-1").await;
        let ids: Vec<&str> = apps.iter().map(|a| a.application_id.as_str()).collect();
        assert_eq!(ids, vec!["app-1", "app-3"]);
    }

    #[tokio::test]
    async fn test_applications_rpc_failure_returns_empty() {
        let client = ContractClient::new(FakeGateway::funded());
        assert!(client.list_applications_for_candidate("cand-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_confirmed() {
        let client = ContractClient::new(FakeGateway::funded());
        let outcome = client.submit_application(&application()).await;
        assert!(outcome.is_success());
        assert_eq!(client.gateway.sends(), 1);
        // estimate + buffer
        assert_eq!(
            *client.gateway.sent_gas.lock().unwrap(),
            Some(U256::from(150_000u64))
        );
    }

    #[tokio::test]
    async fn test_submit_zero_balance_never_broadcasts() {
        let gateway = FakeGateway {
            balance: U256::zero(),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                reason: Rejection::ZeroBalance
            }
        );
        assert_eq!(client.gateway.sends(), 0);
    }

    #[tokio::test]
    async fn test_submit_missing_key_never_broadcasts() {
        let gateway = FakeGateway {
            key: Err(|| ContractError::MissingKey),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                reason: Rejection::MissingKey
            }
        );
        assert_eq!(client.gateway.sends(), 0);
    }

    #[tokio::test]
    async fn test_submit_insufficient_funds_never_broadcasts() {
        let gateway = FakeGateway {
            balance: U256::from(1_000u64),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected {
                reason: Rejection::InsufficientFunds { .. }
            }
        ));
        assert_eq!(client.gateway.sends(), 0);
    }

    #[tokio::test]
    async fn test_gas_estimate_failure_falls_back_to_default() {
        let gateway = FakeGateway {
            gas_estimate: None,
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert!(outcome.is_success());
        assert_eq!(
            *client.gateway.sent_gas.lock().unwrap(),
            Some(U256::from(DEFAULT_GAS_ESTIMATE + GAS_BUFFER))
        );
    }

    #[tokio::test]
    async fn test_receipt_timeout_is_unconfirmed() {
        let gateway = FakeGateway {
            receipt: Ok(None),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway).with_receipt_timeout(Duration::from_millis(5));
        let outcome = client.submit_application(&application()).await;
        assert!(outcome.is_unconfirmed());
        assert!(!outcome.is_success());
        assert_eq!(client.gateway.sends(), 1);
    }

    #[tokio::test]
    async fn test_receipt_error_is_unconfirmed() {
        let gateway = FakeGateway {
            receipt: Err(|| ContractError::Transport("socket closed".to_string())),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::Unconfirmed { ref reason, .. } if reason.contains("socket closed")
        ));
    }

    #[tokio::test]
    async fn test_failed_receipt_status_is_reverted() {
        let gateway = FakeGateway {
            receipt: Ok(Some(ReceiptSummary {
                success: false,
                block_number: Some(7),
                gas_used: None,
                submission_event: false,
            })),
            ..FakeGateway::funded()
        };
        let client = ContractClient::new(gateway);
        let outcome = client.submit_application(&application()).await;
        assert!(matches!(outcome, SubmissionOutcome::Reverted { .. }));
    }
}
