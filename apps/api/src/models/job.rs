use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::models::documents::{DocumentBundle, ValidationReport};

/// Stored URL for records entered by hand rather than sourced.
pub const MANUAL_ENTRY_URL: &str = "Manual Entry";

// ────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle status of a job record.
///
/// scouted → written → validated | failed_validation
/// failed_validation → written (regenerate)
/// validated → validated | failed_validation (re-check)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scouted,
    Written,
    Validated,
    FailedValidation,
}

/// Something that happened to a record and may move its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    DocumentsWritten,
    ValidationPassed,
    ValidationFailed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot apply {event:?} to a record in status '{from}'")]
pub struct TransitionError {
    pub from: JobStatus,
    pub event: LifecycleEvent,
}

#[derive(Debug, Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Scouted => "scouted",
            JobStatus::Written => "written",
            JobStatus::Validated => "validated",
            JobStatus::FailedValidation => "failed_validation",
        }
    }

    /// Applies `event`, returning the next status or the rejected move.
    /// A failed synthesis is not an event: the status simply stays put.
    pub fn apply(self, event: LifecycleEvent) -> Result<JobStatus, TransitionError> {
        use JobStatus::*;
        use LifecycleEvent::*;

        match (self, event) {
            (Scouted | FailedValidation, DocumentsWritten) => Ok(Written),
            (Written | Validated, ValidationPassed) => Ok(Validated),
            (Written | Validated, ValidationFailed) => Ok(FailedValidation),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    pub fn accepts(self, event: LifecycleEvent) -> bool {
        self.apply(event).is_ok()
    }

    /// Validation may only run once a document bundle exists.
    pub fn can_validate(self) -> bool {
        self.accepts(LifecycleEvent::ValidationPassed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scouted" => Ok(JobStatus::Scouted),
            "written" => Ok(JobStatus::Written),
            "validated" => Ok(JobStatus::Validated),
            "failed_validation" => Ok(JobStatus::FailedValidation),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// A tracked job opening owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: String,
    pub salary_range: String,
    pub employment_type: String,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    /// Serialized `DocumentBundle`.
    pub resume_content: Option<String>,
    /// Serialized `ValidationReport`.
    pub validation_report: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn document_bundle(&self) -> Result<Option<DocumentBundle>, serde_json::Error> {
        self.resume_content
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }

    pub fn decoded_report(&self) -> Result<Option<ValidationReport>, serde_json::Error> {
        self.validation_report
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }
}

/// A record about to be inserted. New records always start as `scouted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobRecord {
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: String,
    pub salary_range: String,
    pub employment_type: String,
}

/// A single write applied to an existing record.
#[derive(Debug, Clone)]
pub enum JobUpdate {
    /// Fresh document bundle. Any earlier validation report is cleared.
    Documents {
        resume_content: String,
        status: JobStatus,
    },
    Validation {
        validation_report: String,
        status: JobStatus,
    },
}

impl JobUpdate {
    pub fn status(&self) -> JobStatus {
        match self {
            JobUpdate::Documents { status, .. } | JobUpdate::Validation { status, .. } => *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use JobStatus::*;
    use LifecycleEvent::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(Scouted.apply(DocumentsWritten), Ok(Written));
        assert_eq!(Written.apply(ValidationPassed), Ok(Validated));
        assert_eq!(Written.apply(ValidationFailed), Ok(FailedValidation));
        assert_eq!(FailedValidation.apply(DocumentsWritten), Ok(Written));
        assert_eq!(Validated.apply(ValidationPassed), Ok(Validated));
        assert_eq!(Validated.apply(ValidationFailed), Ok(FailedValidation));
    }

    #[test]
    fn test_validation_outcomes_only_reachable_through_written() {
        for event in [ValidationPassed, ValidationFailed] {
            assert!(Scouted.apply(event).is_err());
        }
        // Documents never land directly in a validated state.
        for from in [Scouted, Written, Validated, FailedValidation] {
            if let Ok(next) = from.apply(DocumentsWritten) {
                assert_eq!(next, Written);
            }
        }
    }

    #[test]
    fn test_rejected_moves() {
        assert!(Written.apply(DocumentsWritten).is_err());
        assert!(Validated.apply(DocumentsWritten).is_err());
        assert!(FailedValidation.apply(ValidationPassed).is_err());
        assert!(!Scouted.can_validate());
        assert!(!FailedValidation.can_validate());
        assert!(Validated.can_validate());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [Scouted, Written, Validated, FailedValidation] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!("submitted".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_transition_error_names_status() {
        let err = Scouted.apply(ValidationPassed).unwrap_err();
        assert!(err.to_string().contains("scouted"));
    }
}
