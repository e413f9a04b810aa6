use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::channel::mpsc::UnboundedSender;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::contract::JobBoard;
use crate::llm_client::CompletionModel;
use crate::matching::scoring::{select_matches, CompatibilityScorer, MatchedJob};
use crate::models::JobFilters;
use crate::resume::pdf::extract_resume_text;
use crate::resume::validation::validate_resume;
use crate::workflow::applications::{
    draft_cover_letter, submit_drafts, ApplicationDraft, SubmissionRecord, SubmissionSummary,
    SUBMISSION_PACING,
};
use crate::workflow::state::{Step, WorkflowInput, WorkflowState};

/// Progress notifications published while a run executes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started {
        candidate_id: String,
    },
    Step {
        step: Step,
        #[serde(skip_serializing_if = "Option::is_none")]
        matched_count: Option<usize>,
    },
    Completed {
        matched_jobs: Vec<MatchedJob>,
        applications: Vec<ApplicationDraft>,
        summary: Option<SubmissionSummary>,
    },
    Error {
        message: String,
    },
}

impl ProgressEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::Started { .. } => "started",
            ProgressEvent::Step { .. } => "step",
            ProgressEvent::Completed { .. } => "completed",
            ProgressEvent::Error { .. } => "error",
        }
    }
}

/// Publishes to an optional listener. A listener that went away is ignored.
struct Progress(Option<UnboundedSender<ProgressEvent>>);

impl Progress {
    fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.0 {
            if tx.unbounded_send(event).is_err() {
                debug!("Progress listener disconnected");
            }
        }
    }
}

/// Orchestrates one job search run over the shared services.
pub struct Workflow {
    job_board: Arc<dyn JobBoard>,
    scorer: Arc<dyn CompatibilityScorer>,
    llm: Arc<dyn CompletionModel>,
    pacing: Duration,
}

impl Workflow {
    pub fn new(
        job_board: Arc<dyn JobBoard>,
        scorer: Arc<dyn CompatibilityScorer>,
        llm: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            job_board,
            scorer,
            llm,
            pacing: SUBMISSION_PACING,
        }
    }

    #[cfg(test)]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn run(&self, input: WorkflowInput) -> WorkflowState {
        self.run_with_progress(input, None).await
    }

    pub async fn run_with_progress(
        &self,
        input: WorkflowInput,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> WorkflowState {
        let progress = Progress(progress);
        let mut state = WorkflowState::new(input);
        info!("Starting job search for candidate {}", state.candidate_id);
        progress.emit(ProgressEvent::Started {
            candidate_id: state.candidate_id.clone(),
        });

        let mut step = Step::Start.next(&state);
        while step != Step::End {
            info!("Workflow step: {}", step.label());
            state = self.execute(step, state).await;
            state.completed_steps.push(step);
            progress.emit(ProgressEvent::Step {
                step,
                matched_count: (step == Step::MatchJobs).then(|| state.matched_jobs.len()),
            });
            step = step.next(&state);
        }

        match state.error() {
            Some(message) => {
                error!("Job search for {} stopped: {message}", state.candidate_id);
                progress.emit(ProgressEvent::Error {
                    message: message.to_string(),
                });
            }
            None => {
                info!(
                    "Job search for {} completed: {} matches, {} applications",
                    state.candidate_id,
                    state.matched_jobs.len(),
                    state.applications.len()
                );
                progress.emit(ProgressEvent::Completed {
                    matched_jobs: state.matched_jobs.clone(),
                    applications: state.applications.clone(),
                    summary: state.summary.clone(),
                });
            }
        }
        state
    }

    /// Submits already drafted applications with the configured pacing.
    pub async fn submit(
        &self,
        drafts: &[ApplicationDraft],
    ) -> (Vec<SubmissionRecord>, SubmissionSummary) {
        submit_drafts(self.job_board.as_ref(), drafts, self.pacing).await
    }

    async fn execute(&self, step: Step, state: WorkflowState) -> WorkflowState {
        match step {
            Step::LoadProfile => self.load_profile(state).await,
            Step::FetchJobs => self.fetch_jobs(state).await,
            Step::MatchJobs => self.match_jobs(state).await,
            Step::GenerateApplications => self.generate_applications(state).await,
            Step::ApplyJobs => self.apply_jobs(state).await,
            Step::Start | Step::End => state,
        }
    }

    async fn load_profile(&self, mut state: WorkflowState) -> WorkflowState {
        if state.resume_text.is_none() {
            if let Some(path) = state.resume_path.clone() {
                let text = match extract_resume_text(Path::new(&path)).await {
                    Ok(text) => text,
                    Err(e) => {
                        state.record_error(format!("Error loading candidate profile: {e}"));
                        return state;
                    }
                };
                let verdict = validate_resume(&text, self.llm.as_ref()).await;
                let valid = verdict.valid;
                if !valid {
                    state.record_error(format!("Invalid resume content: {}", verdict.reason));
                }
                state.resume_validation = Some(verdict);
                if !valid {
                    return state;
                }
                info!("Extracted {} characters of resume text", text.chars().count());
                state.resume_text = Some(text);
            }
        }

        match self.job_board.get_candidate(&state.candidate_id).await {
            Some(candidate) => {
                info!("Loaded profile for candidate {}", candidate.candidate_id);
                state.candidate = Some(candidate);
            }
            None => {
                let message = format!("Candidate {} not found", state.candidate_id);
                state.record_error(message);
            }
        }
        state
    }

    async fn fetch_jobs(&self, mut state: WorkflowState) -> WorkflowState {
        let filters = JobFilters::from_preferences(&state.preferences);
        state.jobs = self.job_board.list_jobs(&filters).await;
        info!("Fetched {} jobs", state.jobs.len());
        state
    }

    async fn match_jobs(&self, mut state: WorkflowState) -> WorkflowState {
        let Some(candidate) = state.candidate.as_ref() else {
            state.record_error("No candidate profile loaded");
            return state;
        };

        let mut evaluated = Vec::with_capacity(state.jobs.len());
        for job in &state.jobs {
            let evaluation = self
                .scorer
                .evaluate(candidate, state.resume_text.as_deref(), job)
                .await;
            evaluated.push((job.clone(), evaluation));
        }

        state.matched_jobs = select_matches(evaluated, state.compatibility_threshold);
        info!(
            "Found {} compatible jobs at threshold {}",
            state.matched_jobs.len(),
            state.compatibility_threshold
        );
        state
    }

    async fn generate_applications(&self, mut state: WorkflowState) -> WorkflowState {
        let Some(candidate) = state.candidate.as_ref() else {
            state.record_error("No candidate profile loaded");
            return state;
        };

        let mut drafts = Vec::with_capacity(state.matched_jobs.len());
        for matched in &state.matched_jobs {
            let mut draft = ApplicationDraft::new(
                &candidate.candidate_id,
                &matched.job,
                Some(matched.compatibility_score),
            );
            if state.draft_cover_letters {
                match draft_cover_letter(
                    self.llm.as_ref(),
                    candidate,
                    state.resume_text.as_deref(),
                    matched,
                )
                .await
                {
                    Ok(letter) => draft.cover_letter = Some(letter),
                    Err(e) => warn!("Cover letter for job {} failed: {e}", matched.job.job_id),
                }
            }
            drafts.push(draft);
        }

        info!("Generated {} applications", drafts.len());
        state.applications = drafts;
        state
    }

    async fn apply_jobs(&self, mut state: WorkflowState) -> WorkflowState {
        let (records, summary) = self.submit(&state.applications).await;
        state.submissions = records;
        state.summary = Some(summary);
        state
    }
}
