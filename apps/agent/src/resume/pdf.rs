//! PDF text extraction wrapper around the `pdf-extract` crate.
//!
//! `pdf-extract` is synchronous and panics on some malformed documents, so every
//! extraction runs on the blocking pool and a panic is reported as an unreadable file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("resume file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read PDF: {0}")]
    Unreadable(String),
}

/// Extracts the text of every page of the PDF at `path`. Single attempt.
pub async fn extract_resume_text(path: impl AsRef<Path>) -> Result<String, ExtractionError> {
    let path = path.as_ref().to_path_buf();
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ExtractionError::NotFound(path));
    }

    let shown = path.display().to_string();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
        .await
        .map_err(|e| ExtractionError::Unreadable(format!("extractor aborted: {e}")))?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    info!("Extracted {} characters from {shown}", text.len());
    Ok(text)
}

/// Extracts text from an in-memory PDF (e.g. a multipart upload).
pub async fn extract_resume_bytes(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Unreadable(format!("extractor aborted: {e}")))?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))
}
