mod config;
mod db;
mod documents;
mod errors;
mod identity;
mod intel;
mod llm_client;
mod models;
mod profile;
mod routes;
mod sourcing;
mod state;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::documents::quality_gate::OracleQualityGate;
use crate::llm_client::{LlmClient, Oracle};
use crate::routes::build_router;
use crate::sourcing::search_scrape::SearchClient;
use crate::sourcing::source::build_source;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    // One outbound client shared by the oracle, the sources and page fetches.
    let http = reqwest::Client::builder().build()?;

    let llm: Arc<dyn Oracle> = Arc::new(LlmClient::new(
        http.clone(),
        config.anthropic_api_key.clone(),
    ));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let source = build_source(&config, http.clone());
    info!("Candidate source: {}", source.name());

    let state = AppState {
        jobs: store.clone(),
        profiles: store,
        llm: llm.clone(),
        source,
        quality_gate: Arc::new(OracleQualityGate::new(llm)),
        search: SearchClient::new(http.clone(), config.search_endpoint.clone()),
        http,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
