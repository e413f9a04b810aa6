//! Proxy for the identity provider's (Privy) user metadata API.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;

pub mod handlers;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Privy credentials not set")]
    MissingCredentials,

    #[error("Privy API error: {body}")]
    Api { status: u16, body: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingCredentials => AppError::Misconfigured(err.to_string()),
            IdentityError::Api { status, .. } => AppError::Upstream {
                status,
                message: err.to_string(),
            },
            IdentityError::Request(_) => AppError::BadGateway(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct IdentityClient {
    client: Client,
    api_url: String,
    app_id: Option<String>,
    app_secret: Option<String>,
}

impl IdentityClient {
    pub fn new(
        api_url: String,
        app_id: Option<String>,
        app_secret: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            app_id,
            app_secret,
        })
    }

    /// POST {api}/v1/users/{user_id}/custom_metadata. Returns the provider's JSON reply.
    pub async fn set_custom_metadata(
        &self,
        user_id: &str,
        metadata: Option<Value>,
    ) -> Result<Value, IdentityError> {
        let (Some(app_id), Some(app_secret)) = (&self.app_id, &self.app_secret) else {
            return Err(IdentityError::MissingCredentials);
        };

        let response = self
            .client
            .post(format!("{}/v1/users/{user_id}/custom_metadata", self.api_url))
            .basic_auth(app_id, Some(app_secret))
            .header("privy-app-id", app_id)
            .json(&json!({ "custom_metadata": metadata }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() >= 400 {
            warn!("Privy rejected metadata update for {user_id}: {status}");
            return Err(IdentityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!("Updated custom metadata for user {user_id}");
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
