/// Resume validation prompt. Replace `{text}` before sending.
pub const RESUME_CHECK_PROMPT_TEMPLATE: &str = r#"Analyze this text and determine if it appears to be resume/CV content.

Text to analyze:
{text}...

Look for indicators like:
- Professional experience
- Education details
- Skills sections
- Contact information
- Work history
- Career-related content

Respond with: VALID: YES/NO | REASON: explanation"#;
