use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::{CompanyProfileInput, JobSeekerProfileInput};
use crate::api::error::ApiError;
use crate::db::models::{CompanyProfileRow, CompanyRow, JobSeekerProfileRow, JobSeekerRow};
use crate::db::profile_repository::ProfileRepository;

#[derive(Clone)]
pub struct ProfileService {
    pool: Pool<Postgres>,
}

impl ProfileService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn company(&self, user_id: Uuid) -> Result<CompanyProfileRow, ApiError> {
        ProfileRepository::company_profile(&self.pool, user_id)
            .await?
            .ok_or(ApiError::NotFound("Company profile"))
    }

    pub async fn save_company(
        &self,
        user_id: Uuid,
        input: &CompanyProfileInput,
    ) -> Result<CompanyRow, ApiError> {
        input.validate()?;
        let row = ProfileRepository::upsert_company(&self.pool, user_id, input).await?;
        info!("Company profile {} saved", row.id);
        Ok(row)
    }

    pub async fn job_seeker(&self, user_id: Uuid) -> Result<JobSeekerProfileRow, ApiError> {
        ProfileRepository::job_seeker_profile(&self.pool, user_id)
            .await?
            .ok_or(ApiError::NotFound("Job seeker profile"))
    }

    pub async fn save_job_seeker(
        &self,
        user_id: Uuid,
        input: &JobSeekerProfileInput,
    ) -> Result<JobSeekerRow, ApiError> {
        input.validate()?;
        let row = ProfileRepository::upsert_job_seeker(&self.pool, user_id, input).await?;
        info!("Job seeker profile {} saved", row.id);
        Ok(row)
    }
}
