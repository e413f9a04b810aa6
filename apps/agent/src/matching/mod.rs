// Candidate ↔ job compatibility: pluggable scorers plus threshold selection.

pub mod prompts;
pub mod scoring;
