/// Cover letter prompt. Replace every `{placeholder}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Generate a professional cover letter for this job application:

Candidate: {name}
Skills: {skills}
Education: {education}
Resume: {resume}

Job: {title} at {company}
Description: {description}
Requirements: {requirements}

Match reasons: {reasons}

Create a concise, professional cover letter (200-300 words) highlighting relevant experience and enthusiasm.
Return only the letter text."#;
