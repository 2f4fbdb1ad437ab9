use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sentinel location used in source queries for remote-only profiles.
pub const REMOTE_LOCATION: &str = "Remote";

/// A job-seeker profile. Written by profile intake, read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Non-empty after intake normalization.
    pub target_roles: Vec<String>,
    pub certifications: Vec<String>,
    pub education: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub portfolio_links: Option<String>,
    pub skills: Option<String>,
    pub work_experience: Option<String>,
    /// Oracle-derived narrative of skills implied by credentials.
    pub cert_skills_description: Option<String>,
    pub master_resume: Option<String>,
    pub master_cover_letter: Option<String>,
    pub remote_only: bool,
    pub distance_miles: i32,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Location string for source queries.
    pub fn search_location(&self) -> &str {
        if self.remote_only {
            REMOTE_LOCATION
        } else {
            &self.location
        }
    }

    /// Commute radius, ignored for remote-only profiles.
    pub fn search_radius(&self) -> Option<i32> {
        (!self.remote_only).then_some(self.distance_miles)
    }
}
