use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matching::scoring::MatchedJob;
use crate::models::{Candidate, Job};
use crate::resume::validation::ResumeVerdict;
use crate::workflow::applications::{ApplicationDraft, SubmissionRecord, SubmissionSummary};

pub const DEFAULT_THRESHOLD: f64 = 0.7;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Caller-supplied parameters of one run. Also the body of POST /search-jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowInput {
    pub candidate_id: String,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    /// Free-form; `location`, `job_type` and `exclude_company` become job filters.
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default = "default_threshold")]
    pub compatibility_threshold: f64,
    #[serde(default)]
    pub auto_apply: bool,
    #[serde(default)]
    pub draft_cover_letters: bool,
}

impl WorkflowInput {
    pub fn new(candidate_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            resume_path: None,
            resume_text: None,
            preferences: Map::new(),
            compatibility_threshold: DEFAULT_THRESHOLD,
            auto_apply: false,
            draft_cover_letters: false,
        }
    }

    pub fn threshold_is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.compatibility_threshold)
    }
}

/// Everything a run knows. Owned by exactly one run and handed from step to step.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub candidate_id: String,
    pub resume_path: Option<String>,
    #[serde(skip)]
    pub resume_text: Option<String>,
    pub preferences: Map<String, Value>,
    pub compatibility_threshold: f64,
    pub auto_apply: bool,
    pub draft_cover_letters: bool,

    pub resume_validation: Option<ResumeVerdict>,
    pub candidate: Option<Candidate>,
    pub jobs: Vec<Job>,
    pub matched_jobs: Vec<MatchedJob>,
    pub applications: Vec<ApplicationDraft>,
    pub submissions: Vec<SubmissionRecord>,
    pub summary: Option<SubmissionSummary>,
    /// Steps that actually ran, in order.
    pub completed_steps: Vec<Step>,
    error: Option<String>,
}

impl WorkflowState {
    pub fn new(input: WorkflowInput) -> Self {
        Self {
            candidate_id: input.candidate_id,
            resume_path: input.resume_path,
            resume_text: input.resume_text.filter(|t| !t.trim().is_empty()),
            preferences: input.preferences,
            compatibility_threshold: input.compatibility_threshold,
            auto_apply: input.auto_apply,
            draft_cover_letters: input.draft_cover_letters,
            resume_validation: None,
            candidate: None,
            jobs: Vec::new(),
            matched_jobs: Vec::new(),
            applications: Vec::new(),
            submissions: Vec::new(),
            summary: None,
            completed_steps: Vec::new(),
            error: None,
        }
    }

    /// Records a failure. The first error wins; later ones are ignored.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start,
    LoadProfile,
    FetchJobs,
    MatchJobs,
    GenerateApplications,
    ApplyJobs,
    End,
}

impl Step {
    /// Transition table. Any recorded error short-circuits to `End`.
    pub fn next(self, state: &WorkflowState) -> Step {
        if state.error().is_some() {
            return Step::End;
        }
        match self {
            Step::Start => Step::LoadProfile,
            Step::LoadProfile => Step::FetchJobs,
            Step::FetchJobs => Step::MatchJobs,
            Step::MatchJobs => Step::GenerateApplications,
            Step::GenerateApplications if state.auto_apply => Step::ApplyJobs,
            Step::GenerateApplications | Step::ApplyJobs | Step::End => Step::End,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::LoadProfile => "load_profile",
            Step::FetchJobs => "fetch_jobs",
            Step::MatchJobs => "match_jobs",
            Step::GenerateApplications => "generate_applications",
            Step::ApplyJobs => "apply_jobs",
            Step::End => "end",
        }
    }
}
