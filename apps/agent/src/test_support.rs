//! In-crate fakes for the external services, shared by unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::contract::{JobBoard, SubmissionOutcome};
use crate::identity::IdentityClient;
use crate::llm_client::{CompletionModel, LlmError};
use crate::matching::scoring::SkillOverlapScorer;
use crate::models::{Application, Candidate, Job, JobFilters, JobStatus, JobType, Location};
use crate::state::AppState;
use crate::workflow::Workflow;

pub fn candidate(skills: &[&str]) -> Candidate {
    Candidate {
        candidate_id: "cand-1".to_string(),
        name: "Ada Lovelace".to_string(),
        description: vec!["Backend engineer".to_string()],
        contacts: vec!["ada@example.com".to_string()],
        education: vec!["BSc Mathematics".to_string()],
        skills: skills.iter().map(|s| s.to_string()).collect(),
        resume_path: vec![],
        profile_score: "0".to_string(),
    }
}

pub fn job(job_id: &str, requirements: &[&str]) -> Job {
    Job {
        job_id: job_id.to_string(),
        company_id: "globex".to_string(),
        title: format!("Engineer {job_id}"),
        description: "Build and operate services".to_string(),
        requirements: requirements.iter().map(|s| s.to_string()).collect(),
        skills: vec![],
        location: Location::Remote,
        salary_range: vec!["90000".to_string(), "120000".to_string()],
        job_type: JobType::Fulltime,
        status: JobStatus::Active,
    }
}

/// A one-page PDF showing `text` in Helvetica. `text` must not contain parentheses
/// or backslashes.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

// ────────────────────────────────────────────────────────────────────────────
// ScriptedModel
// ────────────────────────────────────────────────────────────────────────────

/// Answers by prompt kind. Compatibility prompts get an unparseable reply unless
/// an evaluation is scripted, so scoring falls back to skill overlap.
pub struct ScriptedModel {
    calls: AtomicUsize,
    failing: bool,
    evaluation: Option<String>,
    resume_rejection: Option<String>,
}

impl ScriptedModel {
    pub const COVER_LETTER: &'static str = "Dear hiring team, I would love to join you.";

    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: false,
            evaluation: None,
            resume_rejection: None,
        }
    }

    /// Every call fails with a 503.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn evaluation(mut self, reply: &str) -> Self {
        self.evaluation = Some(reply.to_string());
        self
    }

    /// Resume checks answer `VALID: NO` with this reason.
    pub fn rejecting_resumes(mut self, reason: &str) -> Self {
        self.resume_rejection = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(LlmError::Api {
                status: 503,
                message: "scripted outage".to_string(),
            });
        }

        let reply = if prompt.contains("Analyze job compatibility") {
            self.evaluation.as_deref().unwrap_or("no verdict").to_string()
        } else if prompt.contains("resume/CV content") {
            match &self.resume_rejection {
                Some(reason) => format!("VALID: NO | REASON: {reason}"),
                None => "VALID: YES | REASON: experience and education sections".to_string(),
            }
        } else if prompt.contains("cover letter") {
            Self::COVER_LETTER.to_string()
        } else {
            String::new()
        };
        Ok(reply)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FakeJobBoard
// ────────────────────────────────────────────────────────────────────────────

pub struct FakeJobBoard {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
    outcome: SubmissionOutcome,
    list_calls: AtomicUsize,
    submitted: Mutex<Vec<Application>>,
}

impl FakeJobBoard {
    pub fn new() -> Self {
        Self {
            jobs: vec![],
            candidates: vec![],
            applications: vec![],
            outcome: SubmissionOutcome::Confirmed {
                tx_hash: "0xabc".to_string(),
                block_number: Some(7),
                gas_used: Some("21000".to_string()),
            },
            list_calls: AtomicUsize::new(0),
            submitted: Mutex::new(vec![]),
        }
    }

    pub fn with_jobs(mut self, jobs: Vec<Job>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn with_applications(mut self, applications: Vec<Application>) -> Self {
        self.applications = applications;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Application> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Default for FakeJobBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobBoard for FakeJobBoard {
    async fn list_jobs(&self, filters: &JobFilters) -> Vec<Job> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.jobs
            .iter()
            .filter(|job| filters.matches(job))
            .cloned()
            .collect()
    }

    async fn get_job(&self, job_id: &str) -> Option<Job> {
        self.jobs.iter().find(|j| j.job_id == job_id).cloned()
    }

    async fn get_candidate(&self, candidate_id: &str) -> Option<Candidate> {
        self.candidates
            .iter()
            .find(|c| c.candidate_id == candidate_id)
            .cloned()
    }

    async fn list_applications_for_candidate(&self, candidate_id: &str) -> Vec<Application> {
        self.applications
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect()
    }

    async fn submit_application(&self, application: &Application) -> SubmissionOutcome {
        self.submitted.lock().unwrap().push(application.clone());
        self.outcome.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AppState
// ────────────────────────────────────────────────────────────────────────────

/// State wired to fakes: skill-overlap scoring, no pacing, no identity credentials.
pub fn test_state(board: Arc<FakeJobBoard>, model: ScriptedModel) -> AppState {
    let llm: Arc<dyn CompletionModel> = Arc::new(model);
    let workflow = Workflow::new(board.clone(), Arc::new(SkillOverlapScorer), llm.clone())
        .with_pacing(Duration::ZERO);
    AppState {
        job_board: board,
        llm,
        workflow: Arc::new(workflow),
        identity: IdentityClient::new("http://127.0.0.1:9".to_string(), None, None)
            .expect("identity client"),
    }
}
