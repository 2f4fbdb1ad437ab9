//! Read and delete handlers for job records.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::models::documents::{DocumentBundle, ValidationReport};
use crate::models::job::JobRecord;
use crate::state::AppState;
use crate::store::load_owned;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobRecord,
    pub document_bundle: Option<DocumentBundle>,
    pub validation_report: Option<ValidationReport>,
}

/// GET /api/v1/jobs
///
/// The caller's records, newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = state.jobs.list(user_id).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/v1/jobs/:id
///
/// One record with its decoded bundle and report. Undecodable stored
/// documents are logged and returned as absent.
pub async fn handle_get_job(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = load_owned(state.jobs.as_ref(), job_id, user_id).await?;

    let document_bundle = job.document_bundle().unwrap_or_else(|e| {
        warn!("Job {job_id} has an undecodable document bundle: {e}");
        None
    });
    let validation_report = job.decoded_report().unwrap_or_else(|e| {
        warn!("Job {job_id} has an undecodable validation report: {e}");
        None
    });

    Ok(Json(JobDetailResponse {
        job,
        document_bundle,
        validation_report,
    }))
}

/// DELETE /api/v1/jobs/:id
///
/// Idempotent: deleting a missing record still succeeds. Another user's
/// record is `Unauthorized` and stays in place.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if state.jobs.delete(job_id, user_id).await? {
        info!("Deleted job {job_id}");
    } else if state.jobs.owner_of(job_id).await?.is_some() {
        warn!("User {user_id} tried to delete job {job_id} owned by another user");
        return Err(AppError::Unauthorized);
    }
    Ok(Json(json!({ "success": true })))
}
