//! Job record and profile persistence.
//!
//! Every read and write is scoped by the owning user id. `owner_of` is the one
//! unscoped lookup; it only tells a missing record apart from someone else's.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobRecord, JobUpdate, NewJobRecord};
use crate::models::profile::UserProfile;

pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// All records for the user, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<JobRecord>, sqlx::Error>;

    /// (title, company) of every record the user owns. Always read fresh.
    async fn list_keys(&self, user_id: Uuid) -> Result<Vec<(String, String)>, sqlx::Error>;

    /// Inserts all records as `scouted`, all or nothing.
    async fn insert(
        &self,
        user_id: Uuid,
        records: Vec<NewJobRecord>,
    ) -> Result<Vec<JobRecord>, sqlx::Error>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<JobRecord>, sqlx::Error>;

    /// Owning user of a record, or `None` if no record has this id.
    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, sqlx::Error>;

    /// Applies one write. Returns `false` if the record no longer exists.
    async fn update(&self, id: Uuid, user_id: Uuid, update: JobUpdate)
        -> Result<bool, sqlx::Error>;

    /// Unconditional delete. Returns `false` if nothing was removed.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>;
}

/// Loads a record the caller owns. A missing record is `PreconditionMissing`;
/// a record owned by another user is `Unauthorized`.
pub async fn load_owned(
    jobs: &dyn JobStore,
    id: Uuid,
    user_id: Uuid,
) -> Result<JobRecord, AppError> {
    if let Some(job) = jobs.get(id, user_id).await? {
        return Ok(job);
    }
    match jobs.owner_of(id).await? {
        Some(_) => Err(AppError::Unauthorized),
        None => Err(AppError::PreconditionMissing(format!("Job {id} not found"))),
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error>;

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile, sqlx::Error>;
}
