//! Candidate Source: the interchangeable upstream job-discovery channels.
//!
//! Three strategies sit behind one `CandidateSource` trait:
//! - `SearchScrapeSource`: scrape a public web-search results page
//! - `JobBoardSource`: query a structured job-board API
//! - `GroundedSource`: fetch nothing; the oracle discovers postings itself
//!
//! `build_source` picks one from configuration at startup.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, SourceStrategyKind};
use crate::models::profile::UserProfile;
use crate::sourcing::job_board::JobBoardSource;
use crate::sourcing::search_scrape::{SearchClient, SearchScrapeSource};

/// Browser-like user agent for outbound page and search requests.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// An unshaped job lead. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub snippet: String,
    pub salary: Option<String>,
    pub link: Option<String>,
}

/// Profile-derived search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub roles: Vec<String>,
    pub location: String,
    /// `None` for remote-only searches.
    pub radius_miles: Option<i32>,
}

impl SourceQuery {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            roles: profile
                .target_roles
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            location: profile.search_location().to_string(),
            radius_miles: profile.search_radius(),
        }
    }

    /// Roles joined as an OR query: `Cloud Engineer OR DevOps Engineer`.
    pub fn keywords(&self) -> String {
        self.roles.join(" OR ")
    }
}

/// Whether raw candidates are fetched up front or discovered by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    Fetched,
    Delegated,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} responded with status {status}")]
    Status {
        status: u16,
        source_name: &'static str,
    },

    #[error("could not decode {source_name} response: {message}")]
    Decode {
        source_name: &'static str,
        message: String,
    },
}

#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn discovery(&self) -> Discovery {
        Discovery::Fetched
    }

    /// Zero results is an empty vec, not an error.
    async fn search(&self, query: &SourceQuery) -> Result<Vec<RawCandidate>, SourceError>;
}

/// Grounded-generation strategy: nothing to fetch.
pub struct GroundedSource;

#[async_trait]
impl CandidateSource for GroundedSource {
    fn name(&self) -> &'static str {
        "grounded"
    }

    fn discovery(&self) -> Discovery {
        Discovery::Delegated
    }

    async fn search(&self, _query: &SourceQuery) -> Result<Vec<RawCandidate>, SourceError> {
        Ok(Vec::new())
    }
}

/// Builds the configured strategy.
pub fn build_source(config: &Config, http: Client) -> Arc<dyn CandidateSource> {
    match config.source_strategy {
        SourceStrategyKind::SearchScrape => Arc::new(SearchScrapeSource::new(SearchClient::new(
            http,
            config.search_endpoint.clone(),
        ))),
        SourceStrategyKind::JobBoard => Arc::new(JobBoardSource::new(
            http,
            config.job_board_endpoint.clone(),
            config.job_board_api_key.clone().unwrap_or_default(),
        )),
        SourceStrategyKind::Grounded => Arc::new(GroundedSource),
    }
}
