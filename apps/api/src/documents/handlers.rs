//! Axum route handlers for the Documents API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::documents::quality_gate::{validate_documents, ValidateDocumentsResponse};
use crate::documents::writer::{write_documents, WriteDocumentsResponse};
use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::state::AppState;

/// POST /api/v1/jobs/:id/documents
///
/// Writes (or regenerates) the tailored document bundle for one job.
pub async fn handle_write_documents(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<WriteDocumentsResponse>, AppError> {
    let response = write_documents(
        state.llm.as_ref(),
        state.jobs.as_ref(),
        state.profiles.as_ref(),
        user_id,
        job_id,
    )
    .await?;

    Ok(Json(response))
}

/// POST /api/v1/jobs/:id/validate
///
/// Runs the quality gate over the stored bundle and applies its verdict.
pub async fn handle_validate_documents(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ValidateDocumentsResponse>, AppError> {
    let response = validate_documents(
        state.quality_gate.as_ref(),
        state.jobs.as_ref(),
        user_id,
        job_id,
    )
    .await?;

    Ok(Json(response))
}
