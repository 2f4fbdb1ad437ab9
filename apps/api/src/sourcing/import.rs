//! Manual job import. Bypasses the candidate source and the dedup filter.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, MAX_EMBEDDED_TEXT_CHARS, RAW_JSON_INSTRUCTION};
use crate::llm_client::{generate_json, GenerateOptions, Oracle};
use crate::models::job::{JobRecord, NewJobRecord, MANUAL_ENTRY_URL};
use crate::sourcing::dedup::DEFAULT_EMPLOYMENT_TYPE;
use crate::sourcing::html::extract_page_text;
use crate::sourcing::prompts::IMPORT_PROMPT_TEMPLATE;
use crate::sourcing::source::USER_AGENT;
use crate::store::JobStore;

const NOT_SPECIFIED: &str = DEFAULT_EMPLOYMENT_TYPE;
pub const NO_CONTENT_MESSAGE: &str =
    "No job description content could be extracted. Try pasting the raw text instead.";

#[derive(Debug, Default, Deserialize)]
pub struct ImportJobRequest {
    pub url: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportJobResponse {
    pub job: JobRecord,
}

#[derive(Debug, Deserialize)]
struct ExtractedJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    salary_range: Option<String>,
    #[serde(default)]
    employment_type: Option<String>,
}

pub async fn import_job(
    http: &Client,
    oracle: &dyn Oracle,
    jobs: &dyn JobStore,
    user_id: Uuid,
    request: ImportJobRequest,
) -> Result<JobRecord, AppError> {
    let url = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let content = match request.text.filter(|t| !t.trim().is_empty()) {
        Some(text) => text,
        None => match url.as_deref() {
            Some(url) => fetch_page_text(http, url).await,
            None => String::new(),
        },
    };

    if content.trim().is_empty() {
        return Err(AppError::Validation(NO_CONTENT_MESSAGE.to_string()));
    }

    let prompt = IMPORT_PROMPT_TEMPLATE
        .replace("{raw_content}", truncate_chars(&content, MAX_EMBEDDED_TEXT_CHARS))
        .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION);
    let extracted: ExtractedJob =
        generate_json(oracle, &prompt, GenerateOptions::structured()).await?;

    let record = NewJobRecord {
        title: or_not_specified(extracted.title),
        company: or_not_specified(extracted.company),
        description: extracted.description.trim().to_string(),
        url: url.unwrap_or_else(|| MANUAL_ENTRY_URL.to_string()),
        salary_range: or_not_specified(extracted.salary_range.unwrap_or_default()),
        employment_type: or_not_specified(extracted.employment_type.unwrap_or_default()),
    };

    let mut inserted = jobs.insert(user_id, vec![record]).await?;
    let job = inserted
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Insert returned no record")))?;
    info!("Imported job '{}' at '{}'", job.title, job.company);
    Ok(job)
}

/// Fetches a posting page and reduces it to visible text.
/// Any failure degrades to empty content.
async fn fetch_page_text(http: &Client, raw_url: &str) -> String {
    let url = match Url::parse(raw_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => {
            warn!("Ignoring unfetchable import url '{raw_url}'");
            return String::new();
        }
    };

    let response = match http
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
    {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("Import page fetch returned {}", r.status());
            return String::new();
        }
        Err(e) => {
            warn!("Import page fetch failed: {e}");
            return String::new();
        }
    };

    match response.text().await {
        Ok(html) => extract_page_text(&html),
        Err(e) => {
            warn!("Import page body unreadable: {e}");
            String::new()
        }
    }
}

fn or_not_specified(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        trimmed.to_string()
    }
}
