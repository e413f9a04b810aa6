use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Maps the contract's positional `uint8` onto the enum. Unknown values fall back to PENDING.
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::Pending,
            1 => Self::Reviewed,
            2 => Self::Accepted,
            3 => Self::Rejected,
            other => {
                warn!("Unknown application status index {other}, defaulting to PENDING");
                Self::Pending
            }
        }
    }
}

/// An application linking a candidate to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
    pub job_id: String,
    pub candidate_id: String,
    pub application_date: String,
    pub status: ApplicationStatus,
}
