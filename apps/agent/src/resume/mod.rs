// Resume intake: PDF text extraction and the "does this look like a resume" check.

pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod validation;
