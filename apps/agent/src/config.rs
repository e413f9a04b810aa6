use anyhow::{Context, Result};

const DEFAULT_RPC_URL: &str = "https://testnet.evm.nodes.onflow.org";
const DEFAULT_CONTRACT_ADDRESS: &str = "0x519a9057Bfe3e6bab6EDb7128b7Dba44d2adC083";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_PRIVY_API_URL: &str = "https://api.privy.io";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: String,
    /// Signing key for `submitApplication`. Absent keys only fail at submission time.
    pub private_key: Option<String>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub privy_app_id: Option<String>,
    pub privy_app_secret: Option<String>,
    pub privy_api_url: String,
    pub enable_llm_scoring: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rpc_url: env_or("FLOW_TESTNET_RPC", DEFAULT_RPC_URL),
            contract_address: env_or("CONTRACT_ADDRESS", DEFAULT_CONTRACT_ADDRESS),
            private_key: optional_env("PRIVATE_KEY"),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            privy_app_id: optional_env("PRIVY_APP_ID"),
            privy_app_secret: optional_env("PRIVY_APP_SECRET"),
            privy_api_url: env_or("PRIVY_API_URL", DEFAULT_PRIVY_API_URL),
            enable_llm_scoring: parse_flag(&env_or("ENABLE_LLM_SCORING", "true"))
                .context("ENABLE_LLM_SCORING must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
