use serde::{Deserialize, Serialize};

/// Candidate record as stored by the job-board contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub candidate_id: String,
    pub name: String,
    pub description: Vec<String>,
    pub contacts: Vec<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub resume_path: Vec<String>,
    pub profile_score: String,
}
