//! Axum route handlers for the Intel API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::intel::investigator::{investigate_company, CultureDossier};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IntelRequest {
    pub company: String,
}

#[derive(Debug, Serialize)]
pub struct IntelResponse {
    pub dossier: CultureDossier,
}

/// POST /api/v1/intel
///
/// Builds a culture dossier for one company from public search chatter.
pub async fn handle_investigate(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Json(request): Json<IntelRequest>,
) -> Result<Json<IntelResponse>, AppError> {
    let dossier = investigate_company(&state.search, state.llm.as_ref(), &request.company).await?;
    Ok(Json(IntelResponse { dossier }))
}
