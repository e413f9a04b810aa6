//! Axum route handlers for resume intake.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::resume::pdf::extract_resume_bytes;
use crate::resume::validation::{validate_resume, ResumeVerdict};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: Option<String>,
    pub characters: usize,
    pub resume_text: String,
    pub validation: ResumeVerdict,
}

/// POST /resume/extract
///
/// Accepts a multipart upload with a `file` part, extracts its text and runs the
/// resume check. The returned text can be passed as `resume_text` to /search-jobs.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        let resume_text = extract_resume_bytes(bytes.to_vec()).await?;
        let validation = validate_resume(&resume_text, state.llm.as_ref()).await;

        return Ok(Json(ExtractResponse {
            filename,
            characters: resume_text.chars().count(),
            resume_text,
            validation,
        }));
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'file' part".to_string(),
    ))
}
