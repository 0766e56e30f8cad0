use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::GuaranteeRow;

/// Repository for placement guarantees
///
/// Inserts happen only from the payment completion transaction.
pub struct GuaranteeRepository;

impl GuaranteeRepository {
    /// Insert the guarantee for a just-completed payment; an existing one is kept
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
        payment_id: Uuid,
        terms: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<GuaranteeRow>, sqlx::Error> {
        sqlx::query_as::<_, GuaranteeRow>(
            r#"
            INSERT INTO guarantees (id, application_id, payment_id, terms, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (application_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application_id)
        .bind(payment_id)
        .bind(terms)
        .bind(expires_at)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_application<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
    ) -> Result<Option<GuaranteeRow>, sqlx::Error> {
        sqlx::query_as::<_, GuaranteeRow>("SELECT * FROM guarantees WHERE application_id = $1")
            .bind(application_id)
            .fetch_optional(executor)
            .await
    }

    /// Placement achieved: the guarantee no longer entitles a refund
    pub async fn mark_fulfilled<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE guarantees SET fulfilled = TRUE WHERE application_id = $1")
            .bind(application_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
