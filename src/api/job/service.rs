use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::models::{JobFilter, JobPatch, NewJob};
use crate::api::error::ApiError;
use crate::db::job_repository::JobRepository;
use crate::db::models::{CompanyRow, JobListingRow, JobRow};
use crate::db::profile_repository::ProfileRepository;

const JOB_HAS_PAYMENTS: &str = "Job has paid applications; close it instead of deleting";

/// Job postings: public listing plus company-owned writes
#[derive(Clone)]
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &JobFilter) -> Result<Vec<JobListingRow>, ApiError> {
        Ok(JobRepository::list_active(&self.pool, filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<JobListingRow, ApiError> {
        JobRepository::find_listing(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound("Job"))
    }

    pub async fn create(&self, user_id: Uuid, job: &NewJob) -> Result<JobRow, ApiError> {
        job.validate()?;
        let company = self.company_of(user_id).await?;

        let row = JobRepository::create(&self.pool, company.id, job).await?;
        info!("Company {} posted job {}", company.id, row.id);
        Ok(row)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &JobPatch,
    ) -> Result<JobRow, ApiError> {
        patch.validate()?;
        let job = self.owned_job(user_id, id).await?;

        if let Err(e) = patch.check_salary_against(job.salary_min, job.salary_max) {
            let mut errors = ValidationErrors::new();
            errors.add("salary_min", e);
            return Err(errors.into());
        }

        let row = JobRepository::update(&self.pool, id, patch).await?;
        info!("Job {} updated", id);
        Ok(row)
    }

    /// Remove a job nobody has paid for; paid jobs can only be closed
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        self.owned_job(user_id, id).await?;
        if JobRepository::has_payments(&self.pool, id).await? {
            return Err(ApiError::conflict(JOB_HAS_PAYMENTS));
        }

        // payments.application_id is ON DELETE RESTRICT; covers a payment started meanwhile
        JobRepository::delete(&self.pool, id)
            .await
            .map_err(|e| ApiError::foreign_key_violation_as(e, JOB_HAS_PAYMENTS))?;
        info!("Job {} deleted", id);
        Ok(())
    }

    async fn company_of(&self, user_id: Uuid) -> Result<CompanyRow, ApiError> {
        ProfileRepository::company_for_user(&self.pool, user_id)
            .await?
            .ok_or(ApiError::NotFound("Company profile"))
    }

    /// Jobs of other companies look exactly like missing ones
    async fn owned_job(&self, user_id: Uuid, id: Uuid) -> Result<JobRow, ApiError> {
        let company = self.company_of(user_id).await?;
        match JobRepository::find(&self.pool, id).await? {
            Some(job) if job.company_id == company.id => Ok(job),
            _ => Err(ApiError::NotFound("Job")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::payment_repository::PaymentRepository;
    use crate::db::test_db::{self, TestDb};

    #[actix_web::test]
    async fn paid_job_cannot_be_deleted() {
        let Some(db) = TestDb::new().await else { return };
        let (seeded, payment) = test_db::paid_application(&db.pool).await;
        let jobs = JobService::new(db.pool.clone());

        let result = jobs.delete(seeded.company.id, seeded.job.id).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        let kept = PaymentRepository::find_by_application(&db.pool, seeded.application.id)
            .await
            .unwrap();
        assert_eq!(kept.map(|p| p.id), Some(payment.id));

        // The schema refuses the cascade even without the service check
        let direct = JobRepository::delete(&db.pool, seeded.job.id).await;
        assert!(matches!(
            ApiError::foreign_key_violation_as(direct.unwrap_err(), "in use"),
            ApiError::Conflict(_)
        ));

        db.cleanup().await;
    }

    #[actix_web::test]
    async fn unpaid_job_is_deleted() {
        let Some(db) = TestDb::new().await else { return };
        let seeded = test_db::application(&db.pool, 30).await;
        let jobs = JobService::new(db.pool.clone());

        // Other companies see a missing job
        let (stranger, _) = test_db::company(&db.pool).await;
        let result = jobs.delete(stranger.id, seeded.job.id).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        jobs.delete(seeded.company.id, seeded.job.id).await.unwrap();
        assert!(JobRepository::find(&db.pool, seeded.job.id).await.unwrap().is_none());

        db.cleanup().await;
    }
}
