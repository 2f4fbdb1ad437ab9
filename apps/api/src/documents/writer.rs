//! Document Synthesis: one tailored bundle per job record.
//!
//! Preconditions are checked before the oracle is called. The bundle and the
//! `written` status land in a single store write; a parse failure leaves the
//! record untouched.

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::documents::prompts::{WRITER_PROFILE_BLOCK_TEMPLATE, WRITER_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::{or_fallback, RAW_JSON_INSTRUCTION};
use crate::llm_client::{generate_json, GenerateOptions, Oracle};
use crate::models::documents::DocumentBundle;
use crate::models::job::{JobRecord, JobStatus, JobUpdate, LifecycleEvent};
use crate::models::profile::UserProfile;
use crate::store::{load_owned, JobStore, ProfileStore};

const NOT_PROVIDED: &str = "None provided";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Serialize)]
pub struct WriteDocumentsResponse {
    pub status: JobStatus,
    pub document_bundle: DocumentBundle,
}

#[instrument(skip(oracle, jobs, profiles))]
pub async fn write_documents(
    oracle: &dyn Oracle,
    jobs: &dyn JobStore,
    profiles: &dyn ProfileStore,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<WriteDocumentsResponse, AppError> {
    let job = load_owned(jobs, job_id, user_id).await?;
    let profile = profiles.get_profile(user_id).await?.ok_or_else(|| {
        AppError::PreconditionMissing("Create your profile before writing documents".to_string())
    })?;

    let next_status = job.status.apply(LifecycleEvent::DocumentsWritten)?;

    let prompt = build_writer_prompt(&profile, &job);
    let bundle: DocumentBundle =
        generate_json(oracle, &prompt, GenerateOptions::structured()).await?;

    let resume_content = serde_json::to_string(&bundle)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize bundle: {e}")))?;

    let updated = jobs
        .update(
            job_id,
            user_id,
            JobUpdate::Documents {
                resume_content,
                status: next_status,
            },
        )
        .await?;
    if !updated {
        warn!("Job {job_id} was deleted while its documents were being written");
    }

    info!(
        "Documents written for '{}' at '{}' (match score {})",
        job.title, job.company, bundle.match_score
    );

    Ok(WriteDocumentsResponse {
        status: next_status,
        document_bundle: bundle,
    })
}

fn build_writer_prompt(profile: &UserProfile, job: &JobRecord) -> String {
    let certifications = if profile.certifications.is_empty() {
        "None".to_string()
    } else {
        profile.certifications.join(", ")
    };

    let profile_block = WRITER_PROFILE_BLOCK_TEMPLATE
        .replace("{name}", &profile.name)
        .replace("{location}", &profile.location)
        .replace("{email}", or_fallback(profile.contact_email.as_deref(), NOT_AVAILABLE))
        .replace("{phone}", or_fallback(profile.contact_phone.as_deref(), NOT_AVAILABLE))
        .replace("{links}", or_fallback(profile.portfolio_links.as_deref(), NOT_AVAILABLE))
        .replace("{roles}", &profile.target_roles.join(", "));

    // Work history is substituted last and reaches the oracle verbatim.
    WRITER_PROMPT_TEMPLATE
        .replace("{profile_block}", &profile_block)
        .replace("{skills}", or_fallback(profile.skills.as_deref(), NOT_PROVIDED))
        .replace("{education}", &profile.education)
        .replace("{certifications}", &certifications)
        .replace(
            "{cert_skills}",
            or_fallback(profile.cert_skills_description.as_deref(), NOT_AVAILABLE),
        )
        .replace(
            "{master_resume}",
            or_fallback(profile.master_resume.as_deref(), NOT_PROVIDED),
        )
        .replace(
            "{master_cover_letter}",
            or_fallback(profile.master_cover_letter.as_deref(), NOT_PROVIDED),
        )
        .replace("{job_title}", &job.title)
        .replace("{job_company}", &job.company)
        .replace("{job_description}", &job.description)
        .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION)
        .replace(
            "{work_experience}",
            or_fallback(profile.work_experience.as_deref(), NOT_PROVIDED),
        )
}
