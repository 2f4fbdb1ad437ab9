use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_JOB_BOARD_ENDPOINT: &str = "https://jooble.org/api";
const DEFAULT_SEARCH_ENDPOINT: &str = "https://lite.duckduckgo.com/lite/";

/// Which candidate source feeds the sourcing pipeline.
/// Chosen once at startup; a deployment never mixes strategies within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategyKind {
    /// Scrape a public web-search results page.
    SearchScrape,
    /// Query a structured job-board API.
    JobBoard,
    /// Let the oracle discover postings itself via web search.
    Grounded,
}

impl FromStr for SourceStrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search_scrape" | "scrape" => Ok(Self::SearchScrape),
            "job_board" | "api" => Ok(Self::JobBoard),
            "grounded" => Ok(Self::Grounded),
            other => bail!(
                "Unknown SOURCE_STRATEGY '{other}' (expected search_scrape, job_board or grounded)"
            ),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub source_strategy: SourceStrategyKind,
    pub job_board_api_key: Option<String>,
    pub job_board_endpoint: String,
    pub search_endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let source_strategy = std::env::var("SOURCE_STRATEGY")
            .unwrap_or_else(|_| "grounded".to_string())
            .parse::<SourceStrategyKind>()?;

        let job_board_api_key = std::env::var("JOB_BOARD_API_KEY").ok();
        if source_strategy == SourceStrategyKind::JobBoard && job_board_api_key.is_none() {
            bail!("SOURCE_STRATEGY=job_board requires JOB_BOARD_API_KEY to be set");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            source_strategy,
            job_board_api_key,
            job_board_endpoint: std::env::var("JOB_BOARD_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_JOB_BOARD_ENDPOINT.to_string()),
            search_endpoint: std::env::var("SEARCH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_SEARCH_ENDPOINT.to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
