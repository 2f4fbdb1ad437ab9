//! In-memory fakes for the service seams, shared by unit and router tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::documents::quality_gate::{GateVerdict, QualityGate};
use crate::errors::AppError;
use crate::llm_client::{GenerateOptions, LlmError, Oracle};
use crate::models::documents::{DocumentBundle, ValidationAnalysis, ValidationReport};
use crate::models::job::{JobRecord, JobStatus, JobUpdate, NewJobRecord};
use crate::models::profile::UserProfile;
use crate::sourcing::source::{CandidateSource, RawCandidate, SourceError, SourceQuery};
use crate::store::{JobStore, ProfileStore};

pub fn sample_profile(user_id: Uuid) -> UserProfile {
    UserProfile {
        id: user_id,
        name: "Jane Doe".to_string(),
        location: "Austin, TX".to_string(),
        target_roles: vec!["Cloud Engineer".to_string()],
        certifications: vec!["AWS Solutions Architect".to_string()],
        education: "BS Computer Science".to_string(),
        contact_email: Some("jane@example.com".to_string()),
        contact_phone: None,
        portfolio_links: None,
        skills: Some("Terraform, Kubernetes, Go".to_string()),
        work_experience: Some("Acme (2019-2024) Site Reliability Engineer".to_string()),
        cert_skills_description: None,
        master_resume: None,
        master_cover_letter: None,
        remote_only: true,
        distance_miles: 25,
        updated_at: Utc::now(),
    }
}

pub fn raw_candidate(title: &str, company: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".to_string(),
        snippet: format!("{title} at {company}"),
        salary: None,
        link: None,
    }
}

pub fn job(user_id: Uuid, title: &str, company: &str, status: JobStatus) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        user_id,
        title: title.to_string(),
        company: company.to_string(),
        description: format!("{title} role at {company}"),
        url: String::new(),
        salary_range: "Based on Experience".to_string(),
        employment_type: "Full-Time".to_string(),
        status,
        resume_content: None,
        validation_report: None,
        created_at: Utc::now(),
    }
}

/// A well-formed document bundle reply with the given score value.
pub fn bundle_reply(match_score: Value) -> String {
    json!({
        "match_score": match_score,
        "missing_keywords": ["Terraform"],
        "resume_markdown": "# Jane Doe\n\n## Experience\n- Acme",
        "cover_letter_markdown": "Dear hiring team,",
        "linkedin_outreach": "Hi, I saw your opening.",
        "interview_question": "How would you cut cloud spend by 20%?"
    })
    .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Oracle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OracleCall {
    pub instructions: String,
    pub options: GenerateOptions,
}

/// Replays queued replies in order and records every call.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(
        &self,
        instructions: &str,
        options: GenerateOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(OracleCall {
            instructions: instructions.to_string(),
            options,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    message: "no scripted reply left".to_string(),
                })
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate source
// ────────────────────────────────────────────────────────────────────────────

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct StaticSource {
    candidates: Vec<RawCandidate>,
    fail: bool,
}

impl StaticSource {
    pub fn with(candidates: Vec<RawCandidate>) -> Self {
        Self {
            candidates,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            candidates: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &SourceQuery) -> Result<Vec<RawCandidate>, SourceError> {
        if self.fail {
            return Err(SourceError::Status {
                status: 503,
                source_name: "static",
            });
        }
        Ok(self.candidates.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    jobs: Mutex<Vec<JobRecord>>,
    profiles: Mutex<HashMap<Uuid, UserProfile>>,
}

impl MemoryStore {
    pub fn seed(&self, records: Vec<JobRecord>) {
        self.jobs.lock().unwrap().extend(records);
    }

    pub fn put_profile(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<JobRecord>, sqlx::Error> {
        let mut jobs: Vec<JobRecord> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn list_keys(&self, user_id: Uuid) -> Result<Vec<(String, String)>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.user_id == user_id)
            .map(|j| (j.title.clone(), j.company.clone()))
            .collect())
    }

    async fn insert(
        &self,
        user_id: Uuid,
        records: Vec<NewJobRecord>,
    ) -> Result<Vec<JobRecord>, sqlx::Error> {
        let inserted: Vec<JobRecord> = records
            .into_iter()
            .map(|r| JobRecord {
                id: Uuid::new_v4(),
                user_id,
                title: r.title,
                company: r.company,
                description: r.description,
                url: r.url,
                salary_range: r.salary_range,
                employment_type: r.employment_type,
                status: JobStatus::Scouted,
                resume_content: None,
                validation_report: None,
                created_at: Utc::now(),
            })
            .collect();
        self.jobs.lock().unwrap().extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<JobRecord>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id && j.user_id == user_id)
            .cloned())
    }

    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .map(|j| j.user_id))
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: JobUpdate,
    ) -> Result<bool, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(record) = jobs.iter_mut().find(|j| j.id == id && j.user_id == user_id) else {
            return Ok(false);
        };
        match update {
            JobUpdate::Documents {
                resume_content,
                status,
            } => {
                record.resume_content = Some(resume_content);
                record.validation_report = None;
                record.status = status;
            }
            JobUpdate::Validation {
                validation_report,
                status,
            } => {
                record.validation_report = Some(validation_report);
                record.status = status;
            }
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| !(j.id == id && j.user_id == user_id));
        Ok(jobs.len() < before)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile, sqlx::Error> {
        self.put_profile(profile.clone());
        Ok(profile.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quality gate
// ────────────────────────────────────────────────────────────────────────────

pub struct FixedGate {
    passed: bool,
    calls: AtomicUsize,
}

impl FixedGate {
    pub fn passing() -> Self {
        Self {
            passed: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            passed: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QualityGate for FixedGate {
    async fn evaluate(
        &self,
        _job: &JobRecord,
        bundle: &DocumentBundle,
    ) -> Result<GateVerdict, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let after_score = if self.passed { 90 } else { bundle.match_score };
        Ok(GateVerdict {
            passed: self.passed,
            report: ValidationReport {
                report: if self.passed {
                    "Ready to submit.".to_string()
                } else {
                    "Keyword gaps remain.".to_string()
                },
                analysis: Some(ValidationAnalysis {
                    before_score: bundle.match_score,
                    after_score,
                    skill_gaps_closed: bundle.missing_keywords.clone(),
                }),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_scopes_by_user() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let record = job(owner, "SRE", "Globex", JobStatus::Scouted);
        let id = record.id;
        store.seed(vec![record]);

        let other = Uuid::new_v4();
        assert!(store.get(id, other).await.unwrap().is_none());
        assert_eq!(store.owner_of(id).await.unwrap(), Some(owner));
        assert!(!store.delete(id, other).await.unwrap());
        assert!(store.delete(id, owner).await.unwrap());
        assert!(!store.delete(id, owner).await.unwrap());
    }
}
