// Profile intake prompt templates.

/// Free-text narrative of skills implied by the user's credentials.
/// Replace: {education}, {certifications}
pub const CREDENTIAL_SKILLS_PROMPT_TEMPLATE: &str = r#"You are an expert career analyst.
The user lists the following education and certifications:
Education: {education}
Certifications: {certifications}

Write one concise, dense paragraph naming the SPECIFIC technical and soft skills a person acquires by earning these credentials.
Name the technologies, concepts and methodologies they should be proficient in.
No conversational filler. Just the skills."#;
