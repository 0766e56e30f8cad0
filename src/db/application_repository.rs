use sqlx::PgExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::api::application::models::ApplicationStatus;
use crate::db::models::{ApplicationContext, ApplicationRow, ApplicationSummaryRow};

const SUMMARY_SELECT: &str = r#"
    SELECT a.*,
           j.title AS job_title,
           c.company_name,
           u.name AS applicant_name,
           u.email AS applicant_email,
           p.status AS payment_status
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN companies c ON c.id = j.company_id
    JOIN job_seekers s ON s.id = a.job_seeker_id
    JOIN users u ON u.id = s.user_id
    LEFT JOIN payments p ON p.application_id = a.id
"#;

const CONTEXT_SELECT: &str = r#"
    SELECT j.title AS job_title,
           j.guarantee_terms,
           j.guarantee_period_days,
           c.user_id AS company_user_id,
           cu.email AS company_email,
           s.user_id AS seeker_user_id,
           su.name AS seeker_name,
           su.email AS seeker_email
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN companies c ON c.id = j.company_id
    JOIN users cu ON cu.id = c.user_id
    JOIN job_seekers s ON s.id = a.job_seeker_id
    JOIN users su ON su.id = s.user_id
"#;

/// Repository for applications
pub struct ApplicationRepository;

impl ApplicationRepository {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        job_id: Uuid,
        job_seeker_id: Uuid,
        cover_letter: Option<&str>,
    ) -> Result<ApplicationRow, sqlx::Error> {
        debug!("Creating application: job={}, seeker={}", job_id, job_seeker_id);

        sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, job_id, job_seeker_id, cover_letter)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(job_seeker_id)
        .bind(cover_letter)
        .fetch_one(executor)
        .await
    }

    pub async fn exists_for<'e, E: PgExecutor<'e>>(
        executor: E,
        job_id: Uuid,
        job_seeker_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND job_seeker_id = $2)",
        )
        .bind(job_id)
        .bind(job_seeker_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Application joined with its job, company and seeker
    pub async fn context<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<ApplicationContext>, sqlx::Error> {
        let sql = format!("{} WHERE a.id = $1", CONTEXT_SELECT);
        sqlx::query_as::<_, ApplicationContext>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Same as `context` but keyed by the payment row
    pub async fn context_for_payment<'e, E: PgExecutor<'e>>(
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<ApplicationContext>, sqlx::Error> {
        let sql = format!(
            "{} JOIN payments p ON p.application_id = a.id WHERE p.id = $1",
            CONTEXT_SELECT
        );
        sqlx::query_as::<_, ApplicationContext>(&sql)
            .bind(payment_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_for_job_seeker<'e, E: PgExecutor<'e>>(
        executor: E,
        job_seeker_id: Uuid,
    ) -> Result<Vec<ApplicationSummaryRow>, sqlx::Error> {
        let sql = format!(
            "{} WHERE a.job_seeker_id = $1 ORDER BY a.applied_at DESC",
            SUMMARY_SELECT
        );
        sqlx::query_as::<_, ApplicationSummaryRow>(&sql)
            .bind(job_seeker_id)
            .fetch_all(executor)
            .await
    }

    pub async fn list_for_company<'e, E: PgExecutor<'e>>(
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<ApplicationSummaryRow>, sqlx::Error> {
        let sql = format!("{} WHERE j.company_id = $1 ORDER BY a.applied_at DESC", SUMMARY_SELECT);
        sqlx::query_as::<_, ApplicationSummaryRow>(&sql)
            .bind(company_id)
            .fetch_all(executor)
            .await
    }

    pub async fn list_all<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<ApplicationSummaryRow>, sqlx::Error> {
        let sql = format!("{} ORDER BY a.applied_at DESC", SUMMARY_SELECT);
        sqlx::query_as::<_, ApplicationSummaryRow>(&sql)
            .fetch_all(executor)
            .await
    }

    /// Lock the application row for a status transition
    pub async fn lock_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<ApplicationStatus>, sqlx::Error> {
        sqlx::query_scalar::<_, ApplicationStatus>(
            "SELECT status FROM applications WHERE id = $1 FOR UPDATE",
        )
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn set_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<ApplicationRow, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRow>(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await
    }
}
