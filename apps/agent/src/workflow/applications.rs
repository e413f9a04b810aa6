//! Application drafting and sequential on-chain submission.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::contract::{JobBoard, SubmissionOutcome};
use crate::llm_client::prompts::{excerpt, render, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{CompletionModel, LlmError};
use crate::matching::scoring::MatchedJob;
use crate::models::{Application, ApplicationStatus, Candidate, Job};
use crate::workflow::prompts::COVER_LETTER_PROMPT_TEMPLATE;

/// Delay between consecutive submissions from the shared signing account.
pub const SUBMISSION_PACING: Duration = Duration::from_secs(1);
const COVER_LETTER_RESUME_CHARS: usize = 800;

/// A locally created application plus the context it was drafted from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDraft {
    pub application: Application,
    pub job_title: String,
    pub company_id: String,
    pub compatibility_score: Option<f64>,
    pub cover_letter: Option<String>,
}

impl ApplicationDraft {
    /// Fresh PENDING application dated now.
    pub fn new(candidate_id: &str, job: &Job, compatibility_score: Option<f64>) -> Self {
        Self {
            application: Application {
                application_id: Uuid::new_v4().to_string(),
                job_id: job.job_id.clone(),
                candidate_id: candidate_id.to_string(),
                application_date: Utc::now().to_rfc3339(),
                status: ApplicationStatus::Pending,
            },
            job_title: job.title.clone(),
            company_id: job.company_id.clone(),
            compatibility_score,
            cover_letter: None,
        }
    }
}

pub async fn draft_cover_letter(
    llm: &dyn CompletionModel,
    candidate: &Candidate,
    resume_text: Option<&str>,
    matched: &MatchedJob,
) -> Result<String, LlmError> {
    let job = &matched.job;
    let resume = resume_text
        .map(|t| excerpt(t, COVER_LETTER_RESUME_CHARS))
        .unwrap_or("Not provided");
    let prompt = render(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("name", candidate.name.as_str()),
            ("skills", candidate.skills.join(", ").as_str()),
            ("education", candidate.education.join(", ").as_str()),
            ("resume", resume),
            ("title", job.title.as_str()),
            ("company", job.company_id.as_str()),
            ("description", job.description.as_str()),
            ("requirements", job.requirements.join(", ").as_str()),
            ("reasons", matched.match_reasons.join(", ").as_str()),
        ],
    );

    let letter = llm.complete(&prompt, PLAIN_TEXT_SYSTEM).await?;
    Ok(letter.trim().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub application_id: String,
    pub job_id: String,
    pub outcome: SubmissionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Broadcast but never confirmed; not counted as successful.
    pub unconfirmed: usize,
    pub success_rate: f64,
    pub completed_at: String,
}

impl SubmissionSummary {
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        let total = records.len();
        let successful = records.iter().filter(|r| r.outcome.is_success()).count();
        let unconfirmed = records.iter().filter(|r| r.outcome.is_unconfirmed()).count();
        Self {
            total,
            successful,
            failed: total - successful - unconfirmed,
            unconfirmed,
            success_rate: if total == 0 {
                0.0
            } else {
                successful as f64 / total as f64
            },
            completed_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Submits drafts one at a time, pausing `pacing` between submissions.
/// A failed submission is recorded and the batch continues.
pub async fn submit_drafts(
    job_board: &dyn JobBoard,
    drafts: &[ApplicationDraft],
    pacing: Duration,
) -> (Vec<SubmissionRecord>, SubmissionSummary) {
    let mut records = Vec::with_capacity(drafts.len());

    for (i, draft) in drafts.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        let application = &draft.application;
        let outcome = job_board.submit_application(application).await;
        match &outcome {
            SubmissionOutcome::Confirmed { tx_hash, .. } => info!(
                "Application {} for job {} confirmed: {tx_hash}",
                application.application_id, application.job_id
            ),
            other => warn!(
                "Application {} for job {} not confirmed: {other:?}",
                application.application_id, application.job_id
            ),
        }

        records.push(SubmissionRecord {
            application_id: application.application_id.clone(),
            job_id: application.job_id.clone(),
            outcome,
        });
    }

    let summary = SubmissionSummary::from_records(&records);
    info!(
        "Submitted {} applications: {} confirmed, {} unconfirmed, {} failed",
        summary.total, summary.successful, summary.unconfirmed, summary.failed
    );
    (records, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Rejection;
    use crate::test_support::{job, FakeJobBoard};

    fn record(outcome: SubmissionOutcome) -> SubmissionRecord {
        SubmissionRecord {
            application_id: "a".to_string(),
            job_id: "j".to_string(),
            outcome,
        }
    }

    #[test]
    fn test_draft_is_pending_with_fresh_id() {
        let first = ApplicationDraft::new("cand-1", &job("job-1", &[]), Some(0.8));
        let second = ApplicationDraft::new("cand-1", &job("job-1", &[]), Some(0.8));
        assert_eq!(first.application.status, ApplicationStatus::Pending);
        assert_ne!(first.application.application_id, second.application.application_id);
        assert!(chrono::DateTime::parse_from_rfc3339(&first.application.application_date).is_ok());
    }

    #[test]
    fn test_summary_counts_unconfirmed_separately() {
        let summary = SubmissionSummary::from_records(&[
            record(SubmissionOutcome::Confirmed {
                tx_hash: "0x1".to_string(),
                block_number: Some(1),
                gas_used: None,
            }),
            record(SubmissionOutcome::Unconfirmed {
                tx_hash: "0x2".to_string(),
                reason: "timeout".to_string(),
            }),
            record(SubmissionOutcome::Rejected {
                reason: Rejection::ZeroBalance,
            }),
            record(SubmissionOutcome::Reverted {
                tx_hash: "0x3".to_string(),
            }),
        ]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.unconfirmed, 1);
        assert_eq!(summary.failed, 2);
        assert!((summary.success_rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_has_zero_rate() {
        let summary = SubmissionSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_submissions_run_in_order() {
        let board = FakeJobBoard::new();
        let drafts = vec![
            ApplicationDraft::new("cand-1", &job("job-1", &[]), None),
            ApplicationDraft::new("cand-1", &job("job-2", &[]), None),
        ];
        let (records, summary) = submit_drafts(&board, &drafts, Duration::ZERO).await;
        assert_eq!(records.len(), 2);
        assert_eq!(summary.successful, 2);
        let submitted: Vec<String> = board.submitted().into_iter().map(|a| a.job_id).collect();
        assert_eq!(submitted, vec!["job-1", "job-2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submissions_are_paced() {
        let board = FakeJobBoard::new();
        let drafts: Vec<ApplicationDraft> = (0..3)
            .map(|i| ApplicationDraft::new("cand-1", &job(&format!("job-{i}"), &[]), None))
            .collect();
        let started = tokio::time::Instant::now();
        submit_drafts(&board, &drafts, SUBMISSION_PACING).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= SUBMISSION_PACING * 2, "elapsed {elapsed:?}");
        assert!(elapsed < SUBMISSION_PACING * 3, "elapsed {elapsed:?}");
    }
}
