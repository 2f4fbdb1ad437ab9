// Document synthesis and quality-gate prompt templates.

/// Tailored application documents for one job.
/// Replace: {profile_block}, {skills}, {work_experience}, {education},
/// {certifications}, {cert_skills}, {master_resume}, {master_cover_letter},
/// {job_title}, {job_company}, {job_description}, {raw_json_instruction}
pub const WRITER_PROMPT_TEMPLATE: &str = r#"You are a senior career strategist and ATS-focused resume writer.
Tailor the user's history to the target job below.

Process:
1. Analyze the target job for core requirements and critical keywords.
2. Gap analysis: compare the job against the user's competencies. Give a match score from 0 to 100 and list the missing keywords.
3. Rewrite the resume using the STAR method (Situation, Task, Action, Result).
   - WORK HISTORY RETENTION: include EVERY employer and role listed under [Chronological Work Experience]. Never drop, merge or rename a past job.
   - SKILL INJECTION: weave [Explicit Skills] and [Derived Skills from Credentials] into the bullet points.
   - No placeholders such as "[Insert Skill Here]".
   - Clean markdown with standard headings.
4. Write a targeted cover letter in clean markdown.
5. Draft a 3-sentence LinkedIn message to the recruiter addressing one pain point from the job, and one hard interview question likely for this role.

{profile_block}

======= CORE_COMPETENCIES =======
[Explicit Skills]:
{skills}

[Chronological Work Experience]:
{work_experience}

[Credentials]:
Degrees: {education}
Certifications: {certifications}
Derived Skills from Credentials: {cert_skills}
======= END_CORE_COMPETENCIES =======

======= SUPPLEMENTARY_CONTEXT =======
[Master Resume]:
{master_resume}

[Master Cover Letter]:
{master_cover_letter}
======= END_SUPPLEMENTARY_CONTEXT =======

======= TARGET_JOB =======
Title: {job_title}
Company: {job_company}
Description: {job_description}
======= END_TARGET_JOB =======

Return a JSON object with exactly this structure:
{
  "match_score": 0,
  "missing_keywords": ["keyword"],
  "resume_markdown": "the complete resume, every past job included",
  "cover_letter_markdown": "the cover letter",
  "linkedin_outreach": "a 3-sentence recruiter message",
  "interview_question": "one interview question"
}

{raw_json_instruction}"#;

/// Replace: {name}, {location}, {email}, {phone}, {links}, {roles}
pub const WRITER_PROFILE_BLOCK_TEMPLATE: &str = r#"======= USER_PROFILE =======
Name: {name}
Location: {location}
Email: {email}
Phone: {phone}
Portfolio/Links: {links}
Target Roles: {roles}
======= END_USER_PROFILE ======="#;

/// Audit of a stored document bundle.
/// Replace: {job_title}, {job_company}, {job_description}, {match_score},
/// {missing_keywords}, {resume_markdown}, {cover_letter_markdown}, {raw_json_instruction}
pub const QUALITY_GATE_PROMPT_TEMPLATE: &str = r#"You are a strict ATS compliance auditor.
Audit the tailored resume and cover letter below against the target job.

Check:
1. The resume addresses the job's core requirements.
2. The missing keywords from the original gap analysis are now covered.
3. No placeholders, broken markdown or generic filler remain.

======= TARGET_JOB =======
Title: {job_title}
Company: {job_company}
Description: {job_description}
======= END_TARGET_JOB =======

Original match score: {match_score}
Original missing keywords: {missing_keywords}

======= RESUME =======
{resume_markdown}
======= END_RESUME =======

======= COVER_LETTER =======
{cover_letter_markdown}
======= END_COVER_LETTER =======

Return a JSON object:
{
  "passed": true,
  "report": "a short narrative of what holds up and what must change",
  "analysis": {
    "before_score": 0,
    "after_score": 0,
    "skill_gaps_closed": ["keyword"]
  }
}
"passed" is true only if the documents are ready to submit.

{raw_json_instruction}"#;
