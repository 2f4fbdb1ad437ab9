//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::models::profile::UserProfile;
use crate::profile::intake::{save_profile, ProfileInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::PreconditionMissing("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse { profile }))
}

/// PUT /api/v1/profile
///
/// Validates and upserts the caller's profile, refreshing the
/// credential-skills narrative.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = save_profile(
        state.llm.as_ref(),
        state.profiles.as_ref(),
        user_id,
        input,
    )
    .await?;

    Ok(Json(ProfileResponse { profile }))
}
