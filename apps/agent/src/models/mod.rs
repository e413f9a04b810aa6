pub mod application;
pub mod candidate;
pub mod job;

pub use application::{Application, ApplicationStatus};
pub use candidate::Candidate;
pub use job::{Job, JobFilters, JobStatus, JobType, Location};
