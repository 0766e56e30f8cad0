use sqlx::{PgExecutor, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::api::job::models::{JobFilter, JobPatch, JobStatus, NewJob};
use crate::db::models::{JobListingRow, JobRow};

const LISTING_SELECT: &str = r#"
    SELECT j.*,
           c.company_name,
           c.logo AS company_logo,
           c.location AS company_location,
           c.website AS company_website,
           c.verified AS company_verified
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
"#;

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// Create a new job in the database and return the full job record
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        company_id: Uuid,
        job: &NewJob,
    ) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: title={}, company={}", job.title, company_id);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                id, company_id, title, description, requirements, category, location,
                salary_min, salary_max, guarantee_terms, guarantee_period_days, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.category)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.guarantee_terms)
        .bind(job.guarantee_period_days)
        .bind(job.status.unwrap_or(JobStatus::Active))
        .fetch_one(executor)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_listing<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<JobListingRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        query.push(" WHERE j.id = ").push_bind(id);
        query.build_query_as::<JobListingRow>().fetch_optional(executor).await
    }

    /// Active jobs, newest first, narrowed by the optional filters
    pub async fn list_active<'e, E: PgExecutor<'e>>(
        executor: E,
        filter: &JobFilter,
    ) -> Result<Vec<JobListingRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        query.push(" WHERE j.status = ").push_bind(JobStatus::Active);

        if let Some(category) = filter.category() {
            query.push(" AND j.category = ").push_bind(category.to_string());
        }
        if let Some(location) = filter.location() {
            query
                .push(" AND j.location ILIKE ")
                .push_bind(format!("%{}%", escape_like(location)));
        }
        if let Some(min_salary) = filter.min_salary {
            query.push(" AND j.salary_min >= ").push_bind(min_salary);
        }
        if let Some(search) = filter.search() {
            let pattern = format!("%{}%", escape_like(search));
            query
                .push(" AND (j.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR j.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY j.created_at DESC");
        debug!("Listing jobs: {}", query.sql());

        query.build_query_as::<JobListingRow>().fetch_all(executor).await
    }

    /// Partial update; absent fields keep their value
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        patch: &JobPatch,
    ) -> Result<JobRow, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                requirements = COALESCE($4, requirements),
                category = COALESCE($5, category),
                location = COALESCE($6, location),
                salary_min = COALESCE($7, salary_min),
                salary_max = COALESCE($8, salary_max),
                guarantee_terms = COALESCE($9, guarantee_terms),
                guarantee_period_days = COALESCE($10, guarantee_period_days),
                status = COALESCE($11, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.requirements)
        .bind(&patch.category)
        .bind(&patch.location)
        .bind(patch.salary_min)
        .bind(patch.salary_max)
        .bind(&patch.guarantee_terms)
        .bind(patch.guarantee_period_days)
        .bind(patch.status)
        .fetch_one(executor)
        .await
    }

    /// Whether any application to the job has a payment, in any state
    pub async fn has_payments<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM payments p
                JOIN applications a ON a.id = p.application_id
                WHERE a.job_id = $1
            )
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape LIKE wildcards in user input
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("100%_match"), "100\\%\\_match");
        assert_eq!(escape_like("plain"), "plain");
    }
}
