use sqlx::PgExecutor;
use uuid::Uuid;

use crate::api::profile::models::{CompanyProfileInput, JobSeekerProfileInput};
use crate::db::models::{CompanyProfileRow, CompanyRow, JobSeekerProfileRow, JobSeekerRow};

/// Repository for company and job seeker profiles (1:1 with users)
pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn create_company<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        company_name: &str,
    ) -> Result<CompanyRow, sqlx::Error> {
        sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies (id, user_id, company_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(company_name)
        .fetch_one(executor)
        .await
    }

    pub async fn create_job_seeker<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<JobSeekerRow, sqlx::Error> {
        sqlx::query_as::<_, JobSeekerRow>(
            "INSERT INTO job_seekers (id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    pub async fn company_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<CompanyRow>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn job_seeker_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<JobSeekerRow>, sqlx::Error> {
        sqlx::query_as::<_, JobSeekerRow>("SELECT * FROM job_seekers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn company_profile<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<CompanyProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, CompanyProfileRow>(
            r#"
            SELECT c.*, u.name AS user_name, u.email AS user_email
            FROM companies c
            JOIN users u ON u.id = c.user_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn job_seeker_profile<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<JobSeekerProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, JobSeekerProfileRow>(
            r#"
            SELECT s.*, u.name AS user_name, u.email AS user_email
            FROM job_seekers s
            JOIN users u ON u.id = s.user_id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Insert or replace the company profile of `user_id`
    pub async fn upsert_company<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        input: &CompanyProfileInput,
    ) -> Result<CompanyRow, sqlx::Error> {
        sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies
                (id, user_id, company_name, description, industry, website, location, size, logo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                description = EXCLUDED.description,
                industry = EXCLUDED.industry,
                website = EXCLUDED.website,
                location = EXCLUDED.location,
                size = EXCLUDED.size,
                logo = EXCLUDED.logo,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.company_name)
        .bind(&input.description)
        .bind(&input.industry)
        .bind(non_blank(&input.website))
        .bind(&input.location)
        .bind(&input.size)
        .bind(non_blank(&input.logo))
        .fetch_one(executor)
        .await
    }

    /// Insert or replace the job seeker profile of `user_id`
    pub async fn upsert_job_seeker<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        input: &JobSeekerProfileInput,
    ) -> Result<JobSeekerRow, sqlx::Error> {
        sqlx::query_as::<_, JobSeekerRow>(
            r#"
            INSERT INTO job_seekers
                (id, user_id, phone, location, skills, experience, education, bio, resume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                phone = EXCLUDED.phone,
                location = EXCLUDED.location,
                skills = EXCLUDED.skills,
                experience = EXCLUDED.experience,
                education = EXCLUDED.education,
                bio = EXCLUDED.bio,
                resume = EXCLUDED.resume,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.phone)
        .bind(&input.location)
        .bind(input.skills.clone().unwrap_or_default())
        .bind(input.experience)
        .bind(&input.education)
        .bind(&input.bio)
        .bind(non_blank(&input.resume))
        .fetch_one(executor)
        .await
    }
}

/// Optional URL fields accept "" to clear the value
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
