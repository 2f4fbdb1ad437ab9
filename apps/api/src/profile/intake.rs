//! Profile intake: field validation, normalization and the best-effort
//! credential-skills narrative.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{GenerateOptions, Oracle};
use crate::models::profile::UserProfile;
use crate::profile::prompts::CREDENTIAL_SKILLS_PROMPT_TEMPLATE;
use crate::store::ProfileStore;

pub const DEFAULT_DISTANCE_MILES: i32 = 25;

/// Raw profile form. List fields arrive comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub location: String,
    pub target_roles: String,
    #[serde(default)]
    pub certifications: Option<String>,
    pub education: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub portfolio_links: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub work_experience: Option<String>,
    #[serde(default)]
    pub master_resume: Option<String>,
    #[serde(default)]
    pub master_cover_letter: Option<String>,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub distance_miles: Option<i32>,
}

/// Checks every field and returns the normalized profile (narrative not yet
/// derived). All field errors are reported together.
pub fn normalize_profile(user_id: Uuid, input: ProfileInput) -> Result<UserProfile, AppError> {
    let mut errors: Vec<String> = Vec::new();

    let name = input.name.trim().to_string();
    check_length(&mut errors, "name", &name, 2, 100);
    let location = input.location.trim().to_string();
    check_length(&mut errors, "location", &location, 2, 100);
    let education = input.education.trim().to_string();
    check_length(&mut errors, "education", &education, 2, 500);

    let target_roles = split_list(&input.target_roles);
    if input.target_roles.trim().chars().count() < 2 || target_roles.is_empty() {
        errors.push("target_roles: please specify target roles (comma separated)".to_string());
    }
    let certifications = input
        .certifications
        .as_deref()
        .map(split_list)
        .unwrap_or_default();

    let contact_email = non_blank(input.contact_email);
    if let Some(email) = &contact_email {
        if !is_plausible_email(email) {
            errors.push("contact_email: invalid email".to_string());
        }
    }

    let distance_miles = input.distance_miles.unwrap_or(DEFAULT_DISTANCE_MILES);
    if !(1..=500).contains(&distance_miles) {
        errors.push("distance_miles: must be between 1 and 500".to_string());
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid fields: {}",
            errors.join("; ")
        )));
    }

    Ok(UserProfile {
        id: user_id,
        name,
        location,
        target_roles,
        certifications,
        education,
        contact_email,
        contact_phone: non_blank(input.contact_phone),
        portfolio_links: non_blank(input.portfolio_links),
        skills: non_blank(input.skills),
        work_experience: non_blank(input.work_experience),
        cert_skills_description: None,
        master_resume: non_blank(input.master_resume),
        master_cover_letter: non_blank(input.master_cover_letter),
        remote_only: input.remote_only,
        distance_miles,
        updated_at: Utc::now(),
    })
}

/// Validates, derives the credential narrative and upserts.
pub async fn save_profile(
    oracle: &dyn Oracle,
    profiles: &dyn ProfileStore,
    user_id: Uuid,
    input: ProfileInput,
) -> Result<UserProfile, AppError> {
    let mut profile = normalize_profile(user_id, input)?;

    if !profile.certifications.is_empty() || !profile.education.is_empty() {
        let narrative =
            derive_credential_skills(oracle, &profile.education, &profile.certifications).await;
        profile.cert_skills_description = Some(narrative);
    }

    let saved = profiles.upsert_profile(&profile).await?;
    info!("Saved profile for user {user_id}");
    Ok(saved)
}

/// Best effort: any oracle failure yields an empty narrative.
pub async fn derive_credential_skills(
    oracle: &dyn Oracle,
    education: &str,
    certifications: &[String],
) -> String {
    let certifications = if certifications.is_empty() {
        "None".to_string()
    } else {
        certifications.join(", ")
    };
    let prompt = CREDENTIAL_SKILLS_PROMPT_TEMPLATE
        .replace("{education}", education)
        .replace("{certifications}", &certifications);

    match oracle.generate(&prompt, GenerateOptions::free_text()).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Credential skills narrative unavailable: {e}");
            String::new()
        }
    }
}

fn check_length(errors: &mut Vec<String>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(format!("{field}: must be between {min} and {max} characters"));
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
