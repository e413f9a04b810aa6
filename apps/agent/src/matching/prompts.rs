/// Compatibility prompt template. Replace every `{placeholder}` before sending.
pub const COMPATIBILITY_PROMPT_TEMPLATE: &str = r#"Analyze job compatibility between candidate and job:

Candidate Profile:
- Skills: {skills}
- Education: {education}
- Resume: {resume}

Job Details:
- Title: {title}
- Company: {company}
- Description: {description}
- Requirements: {requirements}
- Location: {location}
- Job type: {job_type}

Analyze the compatibility and provide a detailed assessment.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 0.75,
  "reasons": ["Strong Rust background matches the core requirement"],
  "improvements": ["Gain hands-on Kubernetes experience"]
}

"score" is a number between 0.0 (no fit) and 1.0 (perfect fit)."#;
