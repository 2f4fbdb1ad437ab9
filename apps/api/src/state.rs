use std::sync::Arc;

use reqwest::Client;

use crate::documents::quality_gate::QualityGate;
use crate::llm_client::Oracle;
use crate::sourcing::search_scrape::SearchClient;
use crate::sourcing::source::CandidateSource;
use crate::store::{JobStore, ProfileStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub profiles: Arc<dyn ProfileStore>,
    /// The only path to the text-generation oracle.
    pub llm: Arc<dyn Oracle>,
    /// Configured discovery strategy. Selected once at startup via SOURCE_STRATEGY.
    pub source: Arc<dyn CandidateSource>,
    pub quality_gate: Arc<dyn QualityGate>,
    /// Scraped web search, used by company intel regardless of strategy.
    pub search: SearchClient,
    /// Outbound client for manual-import page fetches.
    pub http: Client,
}
