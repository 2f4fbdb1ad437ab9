pub mod health;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::intel::handlers as intel;
use crate::profile::handlers as profile;
use crate::sourcing::handlers as sourcing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_save_profile),
        )
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/source", post(sourcing::handle_source_jobs))
        .route("/api/v1/jobs/import", post(sourcing::handle_import_job))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        // Documents API
        .route(
            "/api/v1/jobs/:id/documents",
            post(documents::handle_write_documents),
        )
        .route(
            "/api/v1/jobs/:id/validate",
            post(documents::handle_validate_documents),
        )
        // Intel API
        .route("/api/v1/intel", post(intel::handle_investigate))
        .with_state(state)
}
