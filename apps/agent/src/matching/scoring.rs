//! Compatibility scoring: pluggable, trait-based scorer for candidate vs job.
//!
//! Default: `LlmScorer` (structured LLM verdict, degrades to skill overlap per job).
//! Alternative: `SkillOverlapScorer` (pure-Rust, deterministic, no LLM call).
//!
//! The workflow holds an `Arc<dyn CompatibilityScorer>`, chosen at startup via config.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm_client::prompts::{excerpt, render, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, CompletionModel, LlmError};
use crate::matching::prompts::COMPATIBILITY_PROMPT_TEMPLATE;
use crate::models::{Candidate, Job};

const NO_RESUME: &str = "No detailed resume available";
/// Only the head of the resume is shown to the model.
const RESUME_EXCERPT_CHARS: usize = 800;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringBackend {
    Llm,
    SkillOverlap,
}

/// Verdict for one candidate/job pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobEvaluation {
    pub score: f64, // 0.0 to 1.0
    pub reasons: Vec<String>,
    pub improvements: Vec<String>,
    pub backend: ScoringBackend,
}

/// A job that met the caller's threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedJob {
    pub job: Job,
    pub compatibility_score: f64,
    pub match_reasons: Vec<String>,
    pub suggested_improvements: Vec<String>,
    pub scored_by: ScoringBackend,
}

/// Shape the LLM is asked to produce.
#[derive(Debug, Deserialize)]
struct LlmEvaluation {
    score: f64,
    reasons: Vec<String>,
    improvements: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the workflow.
/// Evaluation never fails: backends degrade instead of aborting the batch.
#[async_trait]
pub trait CompatibilityScorer: Send + Sync {
    async fn evaluate(
        &self,
        candidate: &Candidate,
        resume_text: Option<&str>,
        job: &Job,
    ) -> JobEvaluation;
}

// ────────────────────────────────────────────────────────────────────────────
// SkillOverlapScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillOverlapScorer;

#[async_trait]
impl CompatibilityScorer for SkillOverlapScorer {
    async fn evaluate(
        &self,
        candidate: &Candidate,
        _resume_text: Option<&str>,
        job: &Job,
    ) -> JobEvaluation {
        skill_overlap_evaluation(candidate, job)
    }
}

/// |distinct candidate skills ∩ distinct requirements| / |requirements|.
/// Exact, case-sensitive comparison. Zero when the job lists no requirements.
pub fn skill_overlap_score(skills: &[String], requirements: &[String]) -> f64 {
    if requirements.is_empty() {
        return 0.0;
    }
    let skills: HashSet<&str> = skills.iter().map(String::as_str).collect();
    let required: HashSet<&str> = requirements.iter().map(String::as_str).collect();
    skills.intersection(&required).count() as f64 / requirements.len() as f64
}

fn skill_overlap_evaluation(candidate: &Candidate, job: &Job) -> JobEvaluation {
    JobEvaluation {
        score: skill_overlap_score(&candidate.skills, &job.requirements),
        reasons: vec!["Basic skill overlap detected".to_string()],
        improvements: vec![
            "Enhance matching skills".to_string(),
            "Provide more detailed resume".to_string(),
        ],
        backend: ScoringBackend::SkillOverlap,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmScorer {
    llm: Arc<dyn CompletionModel>,
}

impl LlmScorer {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CompatibilityScorer for LlmScorer {
    async fn evaluate(
        &self,
        candidate: &Candidate,
        resume_text: Option<&str>,
        job: &Job,
    ) -> JobEvaluation {
        let prompt = build_prompt(candidate, resume_text, job);
        let verdict = call_json::<LlmEvaluation>(self.llm.as_ref(), &prompt, JSON_ONLY_SYSTEM)
            .await
            .and_then(checked_score);

        match verdict {
            Ok(eval) => {
                debug!("LLM scored job {}: {:.3}", job.job_id, eval.score);
                JobEvaluation {
                    score: eval.score.clamp(0.0, 1.0),
                    reasons: eval.reasons,
                    improvements: eval.improvements,
                    backend: ScoringBackend::Llm,
                }
            }
            Err(e) => {
                warn!(
                    retryable = e.is_retryable(),
                    "Could not score job {} via LLM, using skill overlap: {e}",
                    job.job_id
                );
                skill_overlap_evaluation(candidate, job)
            }
        }
    }
}

fn checked_score(eval: LlmEvaluation) -> Result<LlmEvaluation, LlmError> {
    if eval.score.is_finite() {
        Ok(eval)
    } else {
        Err(LlmError::Schema(format!("score is not a number: {}", eval.score)))
    }
}

fn build_prompt(candidate: &Candidate, resume_text: Option<&str>, job: &Job) -> String {
    let resume = resume_text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| excerpt(t, RESUME_EXCERPT_CHARS))
        .unwrap_or(NO_RESUME);
    render(
        COMPATIBILITY_PROMPT_TEMPLATE,
        &[
            ("skills", candidate.skills.join(", ").as_str()),
            ("education", candidate.education.join(", ").as_str()),
            ("resume", resume),
            ("title", job.title.as_str()),
            ("company", job.company_id.as_str()),
            ("description", job.description.as_str()),
            ("requirements", job.requirements.join(", ").as_str()),
            ("location", job.location.as_str()),
            ("job_type", job.job_type.as_str()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Threshold selection
// ────────────────────────────────────────────────────────────────────────────

/// Keeps evaluations with `score >= threshold` and orders them by score, highest
/// first. The sort is stable, so equal scores keep discovery order.
pub fn select_matches(evaluated: Vec<(Job, JobEvaluation)>, threshold: f64) -> Vec<MatchedJob> {
    let mut matched: Vec<MatchedJob> = evaluated
        .into_iter()
        .filter(|(_, eval)| eval.score >= threshold)
        .map(|(job, eval)| MatchedJob {
            job,
            compatibility_score: eval.score,
            match_reasons: eval.reasons,
            suggested_improvements: eval.improvements,
            scored_by: eval.backend,
        })
        .collect();
    matched.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));
    matched
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
