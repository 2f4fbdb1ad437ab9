use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::job::{JobRecord, JobStatus, JobUpdate, NewJobRecord};
use crate::models::profile::UserProfile;
use crate::store::{JobStore, ProfileStore};

/// PostgreSQL-backed store for job records and profiles.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<JobRecord>, sqlx::Error> {
        sqlx::query_as::<_, JobRecord>(
            "SELECT * FROM job_records WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_keys(&self, user_id: Uuid) -> Result<Vec<(String, String)>, sqlx::Error> {
        sqlx::query_as::<_, (String, String)>(
            "SELECT title, company FROM job_records WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert(
        &self,
        user_id: Uuid,
        records: Vec<NewJobRecord>,
    ) -> Result<Vec<JobRecord>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            let row = sqlx::query_as::<_, JobRecord>(
                r#"
                INSERT INTO job_records
                    (id, user_id, title, company, description, url,
                     salary_range, employment_type, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&record.title)
            .bind(&record.company)
            .bind(&record.description)
            .bind(&record.url)
            .bind(&record.salary_range)
            .bind(&record.employment_type)
            .bind(JobStatus::Scouted.as_str())
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        info!("Inserted {} job records for user {user_id}", inserted.len());
        Ok(inserted)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<JobRecord>, sqlx::Error> {
        sqlx::query_as::<_, JobRecord>("SELECT * FROM job_records WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM job_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: JobUpdate,
    ) -> Result<bool, sqlx::Error> {
        let next_status = update.status();
        // Each variant is one statement so content and status move together.
        let result = match update {
            JobUpdate::Documents {
                resume_content,
                status,
            } => {
                sqlx::query(
                    r#"
                    UPDATE job_records
                    SET resume_content = $1, status = $2, validation_report = NULL
                    WHERE id = $3 AND user_id = $4
                    "#,
                )
                .bind(resume_content)
                .bind(status.as_str())
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?
            }
            JobUpdate::Validation {
                validation_report,
                status,
            } => {
                sqlx::query(
                    r#"
                    UPDATE job_records
                    SET validation_report = $1, status = $2
                    WHERE id = $3 AND user_id = $4
                    "#,
                )
                .bind(validation_report)
                .bind(status.as_str())
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?
            }
        };

        let applied = result.rows_affected() > 0;
        if applied {
            debug!("Job {id} moved to '{next_status}'");
        }
        Ok(applied)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_records WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles
                (id, name, location, target_roles, certifications, education,
                 contact_email, contact_phone, portfolio_links, skills, work_experience,
                 cert_skills_description, master_resume, master_cover_letter,
                 remote_only, distance_miles, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, NOW())
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                location = EXCLUDED.location,
                target_roles = EXCLUDED.target_roles,
                certifications = EXCLUDED.certifications,
                education = EXCLUDED.education,
                contact_email = EXCLUDED.contact_email,
                contact_phone = EXCLUDED.contact_phone,
                portfolio_links = EXCLUDED.portfolio_links,
                skills = EXCLUDED.skills,
                work_experience = EXCLUDED.work_experience,
                cert_skills_description = EXCLUDED.cert_skills_description,
                master_resume = EXCLUDED.master_resume,
                master_cover_letter = EXCLUDED.master_cover_letter,
                remote_only = EXCLUDED.remote_only,
                distance_miles = EXCLUDED.distance_miles,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.location)
        .bind(&profile.target_roles)
        .bind(&profile.certifications)
        .bind(&profile.education)
        .bind(&profile.contact_email)
        .bind(&profile.contact_phone)
        .bind(&profile.portfolio_links)
        .bind(&profile.skills)
        .bind(&profile.work_experience)
        .bind(&profile.cert_skills_description)
        .bind(&profile.master_resume)
        .bind(&profile.master_cover_letter)
        .bind(profile.remote_only)
        .bind(profile.distance_miles)
        .fetch_one(&self.pool)
        .await
    }
}
