use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    #[default]
    Remote,
    Hybrid,
    Onsite,
}

impl Location {
    /// Maps the contract's positional `uint8`. Unknown values fall back to REMOTE.
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::Remote,
            1 => Self::Hybrid,
            2 => Self::Onsite,
            other => {
                warn!("Unknown location index {other}, defaulting to REMOTE");
                Self::Remote
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "REMOTE",
            Self::Hybrid => "HYBRID",
            Self::Onsite => "ONSITE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobType {
    #[default]
    Fulltime,
    Parttime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    /// Maps the contract's positional `uint8`. Unknown values fall back to FULLTIME.
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::Fulltime,
            1 => Self::Parttime,
            2 => Self::Contract,
            3 => Self::Internship,
            4 => Self::Freelance,
            other => {
                warn!("Unknown job type index {other}, defaulting to FULLTIME");
                Self::Fulltime
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fulltime => "FULLTIME",
            Self::Parttime => "PARTTIME",
            Self::Contract => "CONTRACT",
            Self::Internship => "INTERNSHIP",
            Self::Freelance => "FREELANCE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    #[default]
    Active,
    Inactive,
}

impl JobStatus {
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::Active,
            1 => Self::Inactive,
            other => {
                warn!("Unknown job status index {other}, defaulting to ACTIVE");
                Self::Active
            }
        }
    }
}

/// Job posting as stored by the job-board contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: String,
    pub company_id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub location: Location,
    /// `[min, max]` as published on-chain.
    pub salary_range: Vec<String>,
    pub job_type: JobType,
    pub status: JobStatus,
}

/// Optional equality filters applied client-side after `getAllJobs()`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFilters {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub exclude_company: Option<String>,
}

impl JobFilters {
    /// Extracts the recognised filter keys from free-form search preferences.
    /// Non-string or empty values are ignored.
    pub fn from_preferences(preferences: &Map<String, Value>) -> Self {
        let pick = |key: &str| {
            preferences
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            location: pick("location"),
            job_type: pick("job_type"),
            exclude_company: pick("exclude_company"),
        }
    }

    /// Location and job type compare case-insensitively; the company exclusion is exact.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(location) = &self.location {
            if !job.location.as_str().eq_ignore_ascii_case(location) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if !job.job_type.as_str().eq_ignore_ascii_case(job_type) {
                return false;
            }
        }
        if let Some(company) = &self.exclude_company {
            if &job.company_id == company {
                return false;
            }
        }
        true
    }
}
