use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sourcing::html::strip_tags;
use crate::sourcing::source::{CandidateSource, RawCandidate, SourceError, SourceQuery};
use crate::sourcing::synthesis::MAX_FORWARDED_CANDIDATES;

const SOURCE_NAME: &str = "job board";
/// Page offsets are drawn from 1..=MAX_PAGE_OFFSET so repeated searches
/// surface different postings.
const MAX_PAGE_OFFSET: u32 = 3;
const RESULTS_PER_PAGE: u32 = 20;

/// Structured job-board API strategy (Jooble-compatible wire format).
pub struct JobBoardSource {
    http: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct JobBoardRequest<'a> {
    keywords: &'a str,
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<String>,
    page: String,
    #[serde(rename = "ResultOnPage")]
    result_on_page: String,
}

#[derive(Debug, Deserialize)]
struct JobBoardResponse {
    #[serde(default)]
    jobs: Vec<JobBoardPosting>,
}

/// Upstream postings omit fields or send them as `null`; both decode to `None`.
#[derive(Debug, Deserialize)]
struct JobBoardPosting {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl JobBoardSource {
    pub fn new(http: Client, endpoint: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

pub fn pick_page<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(1..=MAX_PAGE_OFFSET)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn into_candidates(response: JobBoardResponse, cap: usize) -> Vec<RawCandidate> {
    response
        .jobs
        .into_iter()
        .take(cap)
        .map(|posting| RawCandidate {
            title: strip_tags(posting.title.as_deref().unwrap_or_default()),
            company: non_empty(posting.company).unwrap_or_default(),
            location: non_empty(posting.location).unwrap_or_default(),
            snippet: strip_tags(posting.snippet.as_deref().unwrap_or_default()),
            salary: non_empty(posting.salary),
            link: non_empty(posting.link),
        })
        .collect()
}

#[async_trait]
impl CandidateSource for JobBoardSource {
    fn name(&self) -> &'static str {
        "job_board"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<RawCandidate>, SourceError> {
        let page = pick_page(&mut rand::thread_rng());
        let keywords = query.keywords();
        let body = JobBoardRequest {
            keywords: &keywords,
            location: &query.location,
            radius: query.radius_miles.map(|r| r.to_string()),
            page: page.to_string(),
            result_on_page: RESULTS_PER_PAGE.to_string(),
        };

        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), self.api_key);
        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                source_name: SOURCE_NAME,
            });
        }

        let decoded: JobBoardResponse =
            response.json().await.map_err(|e| SourceError::Decode {
                source_name: SOURCE_NAME,
                message: e.to_string(),
            })?;

        let candidates = into_candidates(decoded, MAX_FORWARDED_CANDIDATES);
        info!(
            "Job board page {page} returned {} candidates for '{keywords}'",
            candidates.len()
        );
        Ok(candidates)
    }
}
