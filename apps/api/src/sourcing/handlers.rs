//! Axum route handlers for the Sourcing API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::sourcing::import::{import_job, ImportJobRequest, ImportJobResponse};
use crate::sourcing::pipeline::{source_jobs, SourcingResponse};
use crate::state::AppState;

/// POST /api/v1/jobs/source
///
/// Runs one sourcing pass for the caller's stored profile.
pub async fn handle_source_jobs(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<SourcingResponse>, AppError> {
    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionMissing(
                "Create your profile before sourcing jobs".to_string(),
            )
        })?;

    let outcome = source_jobs(
        state.source.as_ref(),
        state.llm.as_ref(),
        state.jobs.as_ref(),
        &profile,
    )
    .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/v1/jobs/import
///
/// Adds one job from pasted text or a posting URL.
pub async fn handle_import_job(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ImportJobRequest>,
) -> Result<Json<ImportJobResponse>, AppError> {
    let job = import_job(
        &state.http,
        state.llm.as_ref(),
        state.jobs.as_ref(),
        user_id,
        request,
    )
    .await?;

    Ok(Json(ImportJobResponse { job }))
}
