//! Five-step job search pipeline: load profile, fetch jobs, match, draft
//! applications and (optionally) submit them on-chain.

pub mod applications;
pub mod handlers;
pub mod prompts;
pub mod runner;
pub mod state;

pub use runner::{ProgressEvent, Workflow};
