use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::FeeConfigRow;

/// Repository for the singleton `application_fee_config` row (id is always 1)
pub struct FeeRepository;

impl FeeRepository {
    /// Read the fee, inserting `default_cents` if the row does not exist yet
    ///
    /// The insert is a no-op when another request created the row first, so
    /// concurrent first reads still leave exactly one row.
    pub async fn get_or_init(
        pool: &Pool<Postgres>,
        default_cents: i32,
    ) -> Result<FeeConfigRow, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO application_fee_config (id, amount_cents) VALUES (1, $1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(default_cents)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            debug!("Initialized application fee to {} cents", default_cents);
        }

        sqlx::query_as::<_, FeeConfigRow>(
            "SELECT amount_cents, updated_by, updated_at FROM application_fee_config WHERE id = 1",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn set(
        pool: &Pool<Postgres>,
        amount_cents: i32,
        updated_by: Option<Uuid>,
    ) -> Result<FeeConfigRow, sqlx::Error> {
        sqlx::query_as::<_, FeeConfigRow>(
            r#"
            INSERT INTO application_fee_config (id, amount_cents, updated_by)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO UPDATE
                SET amount_cents = EXCLUDED.amount_cents,
                    updated_by = EXCLUDED.updated_by,
                    updated_at = NOW()
            RETURNING amount_cents, updated_by, updated_at
            "#,
        )
        .bind(amount_cents)
        .bind(updated_by)
        .fetch_one(pool)
        .await
    }
}
