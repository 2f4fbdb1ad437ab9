//! Synthesis & Ranking: shapes raw candidates (or grounded discovery) into
//! canonical job entries with one oracle call.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, RAW_JSON_INSTRUCTION};
use crate::llm_client::{generate_json, GenerateOptions, Oracle};
use crate::models::profile::UserProfile;
use crate::sourcing::html::strip_tags;
use crate::sourcing::prompts::{
    GROUNDED_PROMPT_TEMPLATE, LOCAL_RULE_TEMPLATE, PROFILE_BLOCK_TEMPLATE,
    RANKING_PROMPT_TEMPLATE, REMOTE_RULE,
};
use crate::sourcing::source::RawCandidate;

/// Entries kept when ranking fetched candidates.
pub const INTERACTIVE_SELECTION: usize = 3;
/// Entries kept when the oracle discovers postings itself.
pub const GROUNDED_SELECTION: usize = 5;
/// Raw candidates embedded in one ranking prompt.
pub const MAX_FORWARDED_CANDIDATES: usize = 15;
const MAX_SNIPPET_CHARS: usize = 600;
const MAX_CANDIDATES_PAYLOAD_CHARS: usize = 12_000;

/// One job entry as returned by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    /// 1-based `ref` of the raw candidate this entry was rewritten from.
    #[serde(rename = "ref", default, deserialize_with = "deserialize_ordinal")]
    pub source_ref: Option<usize>,
    /// Link emitted by the oracle when it discovered the posting itself.
    #[serde(default)]
    pub url: Option<String>,
}

/// What the oracle works from.
#[derive(Debug, Clone, Copy)]
pub enum SynthesisInput<'a> {
    Candidates(&'a [RawCandidate]),
    Grounded,
}

impl SynthesisInput<'_> {
    pub fn selection_cap(&self) -> usize {
        match self {
            SynthesisInput::Candidates(_) => INTERACTIVE_SELECTION,
            SynthesisInput::Grounded => GROUNDED_SELECTION,
        }
    }
}

/// Runs the single shaping call and enforces the selection cap.
/// A parse failure fails the whole invocation.
pub async fn synthesize_jobs(
    oracle: &dyn Oracle,
    profile: &UserProfile,
    input: SynthesisInput<'_>,
) -> Result<Vec<SynthesizedJob>, AppError> {
    let cap = input.selection_cap();
    let (prompt, options) = match input {
        SynthesisInput::Candidates(candidates) => (
            build_ranking_prompt(profile, candidates, cap)?,
            GenerateOptions::structured(),
        ),
        SynthesisInput::Grounded => (
            build_grounded_prompt(profile, cap),
            GenerateOptions::grounded(),
        ),
    };

    let mut jobs: Vec<SynthesizedJob> = generate_json(oracle, &prompt, options).await?;

    let returned = jobs.len();
    jobs.retain(|job| !job.title.trim().is_empty() && !job.company.trim().is_empty());
    if jobs.len() < returned {
        warn!(
            "Dropped {} synthesized entries without title or company",
            returned - jobs.len()
        );
    }
    if jobs.len() > cap {
        warn!("Oracle returned {} entries; keeping {cap}", jobs.len());
        jobs.truncate(cap);
    }

    info!("Synthesis produced {} job entries", jobs.len());
    Ok(jobs)
}

fn location_rule(profile: &UserProfile) -> String {
    match profile.search_radius() {
        None => REMOTE_RULE.to_string(),
        Some(distance) => LOCAL_RULE_TEMPLATE
            .replace("{distance}", &distance.to_string())
            .replace("{location}", &profile.location),
    }
}

fn profile_block(profile: &UserProfile) -> String {
    let certifications = if profile.certifications.is_empty() {
        "None".to_string()
    } else {
        profile.certifications.join(", ")
    };
    PROFILE_BLOCK_TEMPLATE
        .replace("{name}", &profile.name)
        .replace("{location}", &profile.location)
        .replace("{roles}", &profile.target_roles.join(", "))
        .replace("{certifications}", &certifications)
        .replace("{education}", &profile.education)
}

/// Serializes candidates with 1-based `ref` ordinals, HTML-stripped and
/// truncated so the whole list stays under the payload cap.
fn serialize_candidates(candidates: &[RawCandidate]) -> Result<String, AppError> {
    let mut budget = MAX_CANDIDATES_PAYLOAD_CHARS;
    let mut entries: Vec<Value> = Vec::new();

    for (idx, candidate) in candidates
        .iter()
        .take(MAX_FORWARDED_CANDIDATES)
        .enumerate()
    {
        let snippet = strip_tags(&candidate.snippet);
        let entry = json!({
            "ref": idx + 1,
            "title": strip_tags(&candidate.title),
            "company": candidate.company,
            "location": candidate.location,
            "salary": candidate.salary,
            "link": candidate.link,
            "snippet": truncate_chars(&snippet, MAX_SNIPPET_CHARS),
        });
        let size = entry.to_string().len();
        if size > budget {
            break;
        }
        budget -= size;
        entries.push(entry);
    }

    serde_json::to_string_pretty(&entries)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize candidates: {e}")))
}

fn build_ranking_prompt(
    profile: &UserProfile,
    candidates: &[RawCandidate],
    count: usize,
) -> Result<String, AppError> {
    Ok(RANKING_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{location_rule}", &location_rule(profile))
        .replace("{profile_block}", &profile_block(profile))
        .replace("{candidates_json}", &serialize_candidates(candidates)?)
        .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION))
}

fn build_grounded_prompt(profile: &UserProfile, count: usize) -> String {
    GROUNDED_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{location_rule}", &location_rule(profile))
        .replace("{profile_block}", &profile_block(profile))
        .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION)
}

/// Accepts `3`, `"3"` or `null`. Anything else is treated as absent.
fn deserialize_ordinal<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().map(|n| n as usize),
        Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    })
}
