//! Resume content check: a cheap length gate followed by an LLM verdict.

use serde::Serialize;
use tracing::warn;

use crate::llm_client::prompts::{excerpt, render, PLAIN_TEXT_SYSTEM};
use crate::llm_client::CompletionModel;
use crate::resume::prompts::RESUME_CHECK_PROMPT_TEMPLATE;

/// Texts shorter than this (after trimming) are rejected without an LLM call.
pub const MIN_RESUME_CHARS: usize = 50;
/// Only the head of the document is shown to the model.
const VALIDATION_EXCERPT_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeVerdict {
    pub valid: bool,
    pub reason: String,
}

impl ResumeVerdict {
    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Decides whether extracted text is resume content.
pub async fn validate_resume(text: &str, llm: &dyn CompletionModel) -> ResumeVerdict {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_RESUME_CHARS {
        return ResumeVerdict::invalid("Text too short or empty");
    }

    let prompt = render(
        RESUME_CHECK_PROMPT_TEMPLATE,
        &[("text", excerpt(trimmed, VALIDATION_EXCERPT_CHARS))],
    );

    match llm.complete(&prompt, PLAIN_TEXT_SYSTEM).await {
        Ok(response) => parse_verdict(&response),
        Err(e) => {
            warn!("Resume validation call failed: {e}");
            ResumeVerdict::invalid(format!("Validation error: {e}"))
        }
    }
}

/// Parses `VALID: YES/NO | REASON: ...` answers.
fn parse_verdict(response: &str) -> ResumeVerdict {
    if response.contains("VALID: YES") {
        return ResumeVerdict {
            valid: true,
            reason: "Valid resume content detected".to_string(),
        };
    }

    let reason = response
        .rsplit_once("REASON:")
        .map(|(_, reason)| reason.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "Content doesn't appear to be resume-related".to_string());
    ResumeVerdict::invalid(reason)
}
