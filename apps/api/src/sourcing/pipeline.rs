//! Sourcing Pipeline: one user-initiated sourcing run.
//!
//! Stages run strictly in order and no stage starts before the previous one
//! finished: query → candidate source → synthesis → dedup → persistence.
//! Any stage failure ends the run with nothing persisted.

use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::llm_client::Oracle;
use crate::models::job::JobRecord;
use crate::models::profile::UserProfile;
use crate::sourcing::dedup::{filter_new, prepare_records};
use crate::sourcing::source::{CandidateSource, Discovery, RawCandidate, SourceQuery};
use crate::sourcing::synthesis::{synthesize_jobs, SynthesisInput, MAX_FORWARDED_CANDIDATES};
use crate::store::JobStore;

pub const NO_CANDIDATES_MESSAGE: &str = "No job postings found for your target roles right now.";
pub const NO_NEW_JOBS_MESSAGE: &str = "No new jobs found.";

#[derive(Debug)]
pub enum SourcingOutcome {
    Added(Vec<JobRecord>),
    NoNewCandidates { message: &'static str },
}

/// Wire shape: `{jobs}` or `{jobs: [], message}`.
#[derive(Debug, Serialize)]
pub struct SourcingResponse {
    pub jobs: Vec<JobRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<SourcingOutcome> for SourcingResponse {
    fn from(outcome: SourcingOutcome) -> Self {
        match outcome {
            SourcingOutcome::Added(jobs) => Self { jobs, message: None },
            SourcingOutcome::NoNewCandidates { message } => Self {
                jobs: Vec::new(),
                message: Some(message),
            },
        }
    }
}

#[instrument(skip_all, fields(user_id = %profile.id, source = source.name()))]
pub async fn source_jobs(
    source: &dyn CandidateSource,
    oracle: &dyn Oracle,
    jobs: &dyn JobStore,
    profile: &UserProfile,
) -> Result<SourcingOutcome, AppError> {
    let query = SourceQuery::from_profile(profile);
    if query.roles.is_empty() {
        return Err(AppError::Validation(
            "Profile has no target roles to search for".to_string(),
        ));
    }

    let candidates: Vec<RawCandidate> = match source.discovery() {
        Discovery::Fetched => {
            let mut fetched = source.search(&query).await?;
            fetched.truncate(MAX_FORWARDED_CANDIDATES);
            if fetched.is_empty() {
                info!("Source returned no candidates; skipping synthesis");
                return Ok(SourcingOutcome::NoNewCandidates {
                    message: NO_CANDIDATES_MESSAGE,
                });
            }
            info!("Forwarding {} raw candidates to synthesis", fetched.len());
            fetched
        }
        Discovery::Delegated => Vec::new(),
    };

    let input = match source.discovery() {
        Discovery::Fetched => SynthesisInput::Candidates(&candidates),
        Discovery::Delegated => SynthesisInput::Grounded,
    };
    let synthesized = synthesize_jobs(oracle, profile, input).await?;

    let existing = jobs.list_keys(profile.id).await?;
    let fresh = filter_new(synthesized, &existing);
    if fresh.is_empty() {
        info!("Every synthesized job is already tracked");
        return Ok(SourcingOutcome::NoNewCandidates {
            message: NO_NEW_JOBS_MESSAGE,
        });
    }

    let records = prepare_records(fresh, &candidates);
    let inserted = jobs.insert(profile.id, records).await?;
    info!("Sourcing run added {} jobs", inserted.len());

    Ok(SourcingOutcome::Added(inserted))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::models::job::JobStatus;
    use crate::sourcing::source::GroundedSource;
    use crate::testing::{job, raw_candidate, sample_profile, MemoryStore, ScriptedOracle, StaticSource};

    fn three_jobs_reply() -> String {
        json!([
            {"ref": 1, "title": "Cloud Engineer", "company": "Acme", "description": "Run AWS", "salary_range": "$150k"},
            {"ref": 3, "title": "SRE", "company": "Globex", "description": "Keep it up", "employment_type": "Contract"},
            {"ref": 5, "title": "Platform Engineer", "company": "Initech", "description": "K8s"}
        ])
        .to_string()
    }

    fn five_candidates() -> Vec<RawCandidate> {
        (1..=5)
            .map(|i| {
                let mut c = raw_candidate(&format!("Posting {i}"), "Some Co");
                c.link = Some(format!("https://board.example/jobs/{i}"));
                c
            })
            .collect()
    }

    #[tokio::test]
    async fn test_run_persists_three_scouted_jobs() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let source = StaticSource::with(five_candidates());
        let oracle = ScriptedOracle::new(vec![Ok(three_jobs_reply())]);
        let store = MemoryStore::default();

        let outcome = source_jobs(&source, &oracle, &store, &profile).await.unwrap();
        let SourcingOutcome::Added(added) = outcome else {
            panic!("expected jobs to be added");
        };
        assert_eq!(added.len(), 3);
        assert!(added.iter().all(|j| j.status == JobStatus::Scouted));
        assert_eq!(added[0].url, "https://board.example/jobs/1");
        assert_eq!(added[0].employment_type, "Not Specified");
        assert_eq!(added[1].salary_range, "Based on Experience");
        assert_eq!(added[2].url, "https://board.example/jobs/5");
        assert_eq!(store.list(user_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_existing_jobs_are_not_duplicated() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let store = MemoryStore::default();
        store.seed(vec![
            job(user_id, "Cloud Engineer", "Acme", JobStatus::Written),
            job(user_id, "SRE", "Globex", JobStatus::Scouted),
        ]);
        let source = StaticSource::with(five_candidates());
        let oracle = ScriptedOracle::new(vec![Ok(three_jobs_reply())]);

        let outcome = source_jobs(&source, &oracle, &store, &profile).await.unwrap();
        let SourcingOutcome::Added(added) = outcome else {
            panic!("expected one new job");
        };
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].title, "Platform Engineer");

        let stored = store.list(user_id).await.unwrap();
        assert_eq!(stored.len(), 3);
        let mut keys: Vec<_> = stored.iter().map(|j| (j.title.clone(), j.company.clone())).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn test_all_duplicates_reports_no_new_jobs() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let store = MemoryStore::default();
        store.seed(vec![
            job(user_id, "Cloud Engineer", "Acme", JobStatus::Scouted),
            job(user_id, "SRE", "Globex", JobStatus::Scouted),
            job(user_id, "Platform Engineer", "Initech", JobStatus::Scouted),
        ]);
        let source = StaticSource::with(five_candidates());
        let oracle = ScriptedOracle::new(vec![Ok(three_jobs_reply())]);

        let outcome = source_jobs(&source, &oracle, &store, &profile).await.unwrap();
        assert!(matches!(
            outcome,
            SourcingOutcome::NoNewCandidates { message: NO_NEW_JOBS_MESSAGE }
        ));
        assert_eq!(store.list(user_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_candidates_skips_oracle() {
        let profile = sample_profile(Uuid::new_v4());
        let source = StaticSource::with(Vec::new());
        let oracle = ScriptedOracle::new(Vec::new());
        let store = MemoryStore::default();

        let outcome = source_jobs(&source, &oracle, &store, &profile).await.unwrap();
        assert!(matches!(
            outcome,
            SourcingOutcome::NoNewCandidates { message: NO_CANDIDATES_MESSAGE }
        ));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_source_failure_persists_nothing() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let source = StaticSource::failing();
        let oracle = ScriptedOracle::new(vec![Ok(three_jobs_reply())]);
        let store = MemoryStore::default();

        let err = source_jobs(&source, &oracle, &store, &profile).await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
        assert_eq!(oracle.call_count(), 0);
        assert!(store.list(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_oracle_output_persists_nothing() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let source = StaticSource::with(five_candidates());
        let oracle = ScriptedOracle::new(vec![Ok("I found some great jobs for you!".to_string())]);
        let store = MemoryStore::default();

        let err = source_jobs(&source, &oracle, &store, &profile).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput(_)));
        assert!(store.list(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grounded_run_uses_oracle_urls() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let oracle = ScriptedOracle::new(vec![Ok(json!([
            {"title": "SRE", "company": "Acme", "description": "d", "url": "https://acme.example/careers/9"},
            {"title": "Dev", "company": "Globex", "description": "d"}
        ])
        .to_string())]);
        let store = MemoryStore::default();

        let outcome = source_jobs(&GroundedSource, &oracle, &store, &profile)
            .await
            .unwrap();
        let SourcingOutcome::Added(added) = outcome else {
            panic!("expected grounded jobs");
        };
        assert_eq!(added[0].url, "https://acme.example/careers/9");
        assert_eq!(added[1].url, "");
        assert!(oracle.calls()[0].options.web_search);
    }

    #[tokio::test]
    async fn test_whitespace_padded_duplicates_are_not_persisted() {
        let user_id = Uuid::new_v4();
        let profile = sample_profile(user_id);
        let store = MemoryStore::default();
        store.seed(vec![job(user_id, "SRE", "Acme", JobStatus::Scouted)]);
        let oracle = ScriptedOracle::new(vec![Ok(json!([
            {"title": "SRE ", "company": "Acme"},
            {"title": "Dev", "company": "Globex"},
            {"title": " Dev", "company": "Globex "}
        ])
        .to_string())]);

        let outcome = source_jobs(&GroundedSource, &oracle, &store, &profile)
            .await
            .unwrap();
        let SourcingOutcome::Added(added) = outcome else {
            panic!("expected one new job");
        };
        assert_eq!(added.len(), 1);
        assert_eq!((added[0].title.as_str(), added[0].company.as_str()), ("Dev", "Globex"));

        let mut keys: Vec<_> = store
            .list(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|j| (j.title, j.company))
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ("Dev".to_string(), "Globex".to_string()),
                ("SRE".to_string(), "Acme".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_profile_without_roles_is_rejected() {
        let mut profile = sample_profile(Uuid::new_v4());
        profile.target_roles = vec!["  ".to_string()];
        let oracle = ScriptedOracle::new(Vec::new());
        let store = MemoryStore::default();

        let err = source_jobs(&GroundedSource, &oracle, &store, &profile)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_no_new_candidates_response_shape() {
        let response: SourcingResponse = SourcingOutcome::NoNewCandidates {
            message: NO_NEW_JOBS_MESSAGE,
        }
        .into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["jobs"], json!([]));
        assert_eq!(json["message"], NO_NEW_JOBS_MESSAGE);
    }
}
