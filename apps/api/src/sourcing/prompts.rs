// Sourcing prompt templates.
// All prompts for candidate shaping, grounded discovery and manual import live here.

/// Ranking prompt over fetched candidates.
/// Replace: {count}, {location_rule}, {profile_block}, {candidates_json}, {raw_json_instruction}
pub const RANKING_PROMPT_TEMPLATE: &str = r#"You are a job targeting agent.
Below are real job postings fetched for this user. Select the {count} postings that best match the user's profile and rewrite each into the schema below.
{location_rule}

{profile_block}

======= CANDIDATE_POSTINGS =======
{candidates_json}
======= END_CANDIDATE_POSTINGS =======

Return a JSON ARRAY of at most {count} objects:
[
  {
    "ref": 3,
    "title": "the exact job title",
    "company": "the hiring company",
    "description": "a 50-150 word summary of the role and its requirements",
    "salary_range": "$120,000 - $140,000 or \"Based on Experience\" if unknown",
    "employment_type": "Full-Time, Contract or Part-Time"
  }
]

HARD RULES:
1. "ref" MUST be the "ref" number of the posting you rewrote. Never invent a posting.
2. If the company is not stated, infer it from the title or link; never leave it blank.
3. Use ONLY facts present in the posting.

{raw_json_instruction}"#;

/// Grounded discovery prompt: the oracle searches the web itself.
/// Replace: {count}, {location_rule}, {profile_block}, {raw_json_instruction}
pub const GROUNDED_PROMPT_TEMPLATE: &str = r#"You are a job targeting agent with web search.
Search the web for {count} recent, currently open job postings that match the user's profile.
Prefer direct company careers pages, LinkedIn, or high-quality boards. Avoid aggregators where possible.
{location_rule}

{profile_block}

Return a JSON ARRAY of exactly {count} objects:
[
  {
    "title": "the exact job title",
    "company": "the hiring company",
    "description": "a 50-150 word summary of the role and its requirements",
    "salary_range": "$120,000 - $140,000 or \"Based on Experience\" if unknown",
    "employment_type": "Full-Time, Contract or Part-Time",
    "url": "the direct link to the real posting"
  }
]

{raw_json_instruction}"#;

pub const REMOTE_RULE: &str =
    "STRICT: You must ONLY return 100% remote positions. No hybrid, no on-site.";

/// Replace: {distance}, {location}
pub const LOCAL_RULE_TEMPLATE: &str = "Location context: the user prefers jobs within {distance} miles of {location}, but some remote roles are also acceptable.";

/// Replace: {name}, {location}, {roles}, {certifications}, {education}
pub const PROFILE_BLOCK_TEMPLATE: &str = r#"======= USER_PROFILE_DATA =======
Name: {name}
Location: {location}
Target Roles: {roles}
Certifications: {certifications}
Education: {education}
======= END_USER_PROFILE_DATA ======="#;

/// Manual import extraction prompt.
/// Replace: {raw_content}, {raw_json_instruction}
pub const IMPORT_PROMPT_TEMPLATE: &str = r#"You are an expert ATS parser and job data extractor.
Analyze the following raw text from a job posting and extract the core job details.
If information is missing, use "Not Specified".

======= RAW_CONTENT =======
{raw_content}
======= END_RAW_CONTENT =======

Return a JSON object:
{
  "title": "the job title",
  "company": "the hiring company",
  "description": "a clean, concise summary of the job and requirements, under 200 words",
  "salary_range": "e.g. \"$120k\" or \"Not Specified\"",
  "employment_type": "e.g. \"Full-Time\", \"Contract\" or \"Not Specified\""
}

{raw_json_instruction}"#;
