use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetadataUpdateRequest {
    pub user_id: String,
    #[serde(default)]
    pub custom_metadata: Option<Value>,
}

/// POST /set-user-metadata
pub async fn handle_set_user_metadata(
    State(state): State<AppState>,
    Json(req): Json<MetadataUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    let reply = state
        .identity
        .set_custom_metadata(&req.user_id, req.custom_metadata)
        .await?;
    Ok(Json(reply))
}
