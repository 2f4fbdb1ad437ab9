//! Quality Gate: pass/fail audit of a stored document bundle.
//!
//! The gate itself sits behind `QualityGate`; `validate_documents` owns the
//! lifecycle rules around it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::documents::prompts::QUALITY_GATE_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::RAW_JSON_INSTRUCTION;
use crate::llm_client::{generate_json, GenerateOptions, Oracle};
use crate::models::documents::{DocumentBundle, ValidationAnalysis, ValidationReport};
use crate::models::job::{JobRecord, JobStatus, JobUpdate, LifecycleEvent};
use crate::store::{load_owned, JobStore};

/// What the gate decided about one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct GateVerdict {
    pub passed: bool,
    pub report: ValidationReport,
}

impl GateVerdict {
    pub fn event(&self) -> LifecycleEvent {
        if self.passed {
            LifecycleEvent::ValidationPassed
        } else {
            LifecycleEvent::ValidationFailed
        }
    }
}

#[async_trait]
pub trait QualityGate: Send + Sync {
    async fn evaluate(
        &self,
        job: &JobRecord,
        bundle: &DocumentBundle,
    ) -> Result<GateVerdict, AppError>;
}

/// Oracle-backed audit: re-scores the tailored documents against the job.
pub struct OracleQualityGate {
    oracle: Arc<dyn Oracle>,
}

impl OracleQualityGate {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

#[derive(Debug, Deserialize)]
struct AuditReply {
    passed: bool,
    #[serde(default)]
    report: String,
    #[serde(default)]
    analysis: Option<ValidationAnalysis>,
}

#[async_trait]
impl QualityGate for OracleQualityGate {
    async fn evaluate(
        &self,
        job: &JobRecord,
        bundle: &DocumentBundle,
    ) -> Result<GateVerdict, AppError> {
        let prompt = QUALITY_GATE_PROMPT_TEMPLATE
            .replace("{job_title}", &job.title)
            .replace("{job_company}", &job.company)
            .replace("{job_description}", &job.description)
            .replace("{match_score}", &bundle.match_score.to_string())
            .replace("{missing_keywords}", &bundle.missing_keywords.join(", "))
            .replace("{cover_letter_markdown}", &bundle.cover_letter_markdown)
            .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION)
            .replace("{resume_markdown}", &bundle.resume_markdown);

        let reply: AuditReply =
            generate_json(self.oracle.as_ref(), &prompt, GenerateOptions::structured()).await?;

        Ok(GateVerdict {
            passed: reply.passed,
            report: ValidationReport {
                report: reply.report,
                analysis: reply.analysis,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateDocumentsResponse {
    pub status: JobStatus,
    pub report: ValidationReport,
}

#[instrument(skip(gate, jobs))]
pub async fn validate_documents(
    gate: &dyn QualityGate,
    jobs: &dyn JobStore,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<ValidateDocumentsResponse, AppError> {
    let job = load_owned(jobs, job_id, user_id).await?;

    if !job.status.can_validate() {
        return Err(AppError::InvalidTransition(format!(
            "Documents for a '{}' job cannot be validated; write them first",
            job.status
        )));
    }

    let bundle = job
        .document_bundle()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored document bundle is corrupt: {e}")))?
        .ok_or_else(|| {
            AppError::PreconditionMissing("No documents have been written for this job".to_string())
        })?;

    let verdict = gate.evaluate(&job, &bundle).await?;
    let next_status = job.status.apply(verdict.event())?;

    let validation_report = serde_json::to_string(&verdict.report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {e}")))?;

    let updated = jobs
        .update(
            job_id,
            user_id,
            JobUpdate::Validation {
                validation_report,
                status: next_status,
            },
        )
        .await?;
    if !updated {
        warn!("Job {job_id} was deleted while it was being validated");
    }

    info!("Quality gate for job {job_id}: {next_status}");

    Ok(ValidateDocumentsResponse {
        status: next_status,
        report: verdict.report,
    })
}
