//! `ChainGateway` backed by an ethers HTTP provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::contract::{Contract, ContractError as EthersContractError};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, H256, U256, U64};

use crate::contract::abi::{application_submitted_topic, load_abi};
use crate::contract::{ChainGateway, ContractError, PreparedCall, ReceiptSummary};

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct EthersGateway {
    provider: Arc<Provider<Http>>,
    contract: Contract<Provider<Http>>,
    submission_topic: H256,
    private_key: Option<String>,
}

impl EthersGateway {
    pub fn connect(
        rpc_url: &str,
        contract_address: &str,
        private_key: Option<String>,
    ) -> Result<Self, ContractError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ContractError::Transport(format!("invalid RPC url {rpc_url}: {e}")))?;
        let provider = Arc::new(provider);
        let address: Address = contract_address
            .parse()
            .map_err(|e| ContractError::Abi(format!("invalid contract address: {e}")))?;
        let abi: Abi = load_abi()?;
        let submission_topic = application_submitted_topic(&abi)?;

        Ok(Self {
            contract: Contract::new(address, abi, provider.clone()),
            provider,
            submission_topic,
            private_key,
        })
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    fn wallet(&self) -> Result<LocalWallet, ContractError> {
        let key = self
            .private_key
            .as_deref()
            .ok_or(ContractError::MissingKey)?;
        key.trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| ContractError::InvalidKey(e.to_string()))
    }

    fn summarize(&self, receipt: &TransactionReceipt) -> ReceiptSummary {
        ReceiptSummary {
            success: receipt.status == Some(U64::from(1)),
            block_number: receipt.block_number.map(|n| n.as_u64()),
            gas_used: receipt.gas_used,
            submission_event: receipt
                .logs
                .iter()
                .any(|log| log.topics.first() == Some(&self.submission_topic)),
        }
    }
}

fn classify<M: Middleware>(err: EthersContractError<M>) -> ContractError {
    match err {
        EthersContractError::Revert(data) => ContractError::Reverted(data.to_string()),
        EthersContractError::AbiError(e) => ContractError::Abi(e.to_string()),
        EthersContractError::DetokenizationError(e) => ContractError::Decode(e.to_string()),
        other => ContractError::Transport(other.to_string()),
    }
}

fn transport(err: impl std::fmt::Display) -> ContractError {
    ContractError::Transport(err.to_string())
}

#[async_trait]
impl ChainGateway for EthersGateway {
    async fn call(&self, function: &'static str, args: Vec<Token>) -> Result<Token, ContractError> {
        self.contract
            .method::<_, Token>(function, Token::Tuple(args))
            .map_err(|e| ContractError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(classify)
    }

    fn signer_address(&self) -> Result<Address, ContractError> {
        Ok(self.wallet()?.address())
    }

    async fn balance(&self, account: Address) -> Result<U256, ContractError> {
        self.provider
            .get_balance(account, None)
            .await
            .map_err(transport)
    }

    async fn gas_price(&self) -> Result<U256, ContractError> {
        self.provider.get_gas_price().await.map_err(transport)
    }

    async fn estimate_gas(
        &self,
        function: &'static str,
        args: Vec<Token>,
        from: Address,
    ) -> Result<U256, ContractError> {
        self.contract
            .method::<_, ()>(function, Token::Tuple(args))
            .map_err(|e| ContractError::Abi(e.to_string()))?
            .from(from)
            .estimate_gas()
            .await
            .map_err(classify)
    }

    async fn send(&self, prepared: PreparedCall) -> Result<H256, ContractError> {
        let wallet = self.wallet()?;
        let chain_id = self.provider.get_chainid().await.map_err(transport)?;
        let wallet = wallet.with_chain_id(chain_id.as_u64());
        let client = Arc::new(SignerMiddleware::new((*self.provider).clone(), wallet));
        let contract = Contract::new(self.address(), self.contract.abi().clone(), client);

        let tx = contract
            .method::<_, ()>(prepared.function, Token::Tuple(prepared.args))
            .map_err(|e| ContractError::Abi(e.to_string()))?
            .legacy()
            .gas(prepared.gas)
            .gas_price(prepared.gas_price);
        let pending = tx.send().await.map_err(classify)?;

        Ok(pending.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        timeout: Duration,
    ) -> Result<Option<ReceiptSummary>, ContractError> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                    Err(e) => return Err(transport(e)),
                }
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(Ok(receipt)) => Ok(Some(self.summarize(&receipt))),
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }
}
