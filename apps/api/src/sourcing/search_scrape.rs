use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::sourcing::html::{parse_search_results, parse_snippets, SearchHit};
use crate::sourcing::source::{
    CandidateSource, RawCandidate, SourceError, SourceQuery, USER_AGENT,
};

const SOURCE_NAME: &str = "web search";

/// Thin client for a public, form-posted web search page.
#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(http: Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    async fn fetch(&self, query: &str) -> Result<String, SourceError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .form(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                source_name: SOURCE_NAME,
            });
        }

        Ok(response.text().await?)
    }

    /// Candidate-shaped results: one hit per matched result node.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SourceError> {
        let body = self.fetch(query).await?;
        let hits = parse_search_results(&body);
        debug!("Search '{query}' matched {} result nodes", hits.len());
        Ok(hits)
    }

    /// Intel-shaped results: snippet text only.
    pub async fn snippets(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let body = self.fetch(query).await?;
        Ok(parse_snippets(&body))
    }
}

/// Scraped-search strategy.
pub struct SearchScrapeSource {
    client: SearchClient,
}

impl SearchScrapeSource {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }
}

/// `("Cloud Engineer" OR "SRE") jobs Remote`
pub fn job_search_phrase(query: &SourceQuery) -> String {
    let roles = query
        .roles
        .iter()
        .map(|r| format!("\"{r}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({roles}) jobs {}", query.location)
}

pub fn hits_to_candidates(hits: Vec<SearchHit>, location: &str) -> Vec<RawCandidate> {
    hits.into_iter()
        .map(|hit| RawCandidate {
            title: hit.title,
            // Search pages carry no structured employer; the oracle infers it.
            company: String::new(),
            location: location.to_string(),
            snippet: hit.snippet,
            salary: None,
            link: hit.url,
        })
        .collect()
}

#[async_trait]
impl CandidateSource for SearchScrapeSource {
    fn name(&self) -> &'static str {
        "search_scrape"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<RawCandidate>, SourceError> {
        let phrase = job_search_phrase(query);
        let hits = self.client.search(&phrase).await?;
        info!("Scraped search returned {} candidates", hits.len());
        Ok(hits_to_candidates(hits, &query.location))
    }
}
