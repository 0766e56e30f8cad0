use sqlx::PgExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::api::refund::models::RefundStatus;
use crate::db::models::{RefundListingRow, RefundRow};

/// Repository for refunds (one per payment)
pub struct RefundRepository;

impl RefundRepository {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        payment_id: Uuid,
        amount_cents: i32,
        reason: &str,
    ) -> Result<RefundRow, sqlx::Error> {
        debug!("Creating refund request for payment {}", payment_id);

        sqlx::query_as::<_, RefundRow>(
            r#"
            INSERT INTO refunds (id, payment_id, amount_cents, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payment_id)
        .bind(amount_cents)
        .bind(reason)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_payment<'e, E: PgExecutor<'e>>(
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<RefundRow>, sqlx::Error> {
        sqlx::query_as::<_, RefundRow>("SELECT * FROM refunds WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn lock<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<RefundRow>, sqlx::Error> {
        sqlx::query_as::<_, RefundRow>("SELECT * FROM refunds WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn update_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        status: RefundStatus,
        admin_notes: Option<&str>,
        gateway_refund_id: Option<&str>,
    ) -> Result<RefundRow, sqlx::Error> {
        sqlx::query_as::<_, RefundRow>(
            r#"
            UPDATE refunds SET
                status = $2,
                admin_notes = COALESCE($3, admin_notes),
                gateway_refund_id = COALESCE($4, gateway_refund_id),
                processed_at = CASE
                    WHEN $2 = 'PROCESSED'::refund_status THEN NOW()
                    ELSE processed_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(admin_notes)
        .bind(gateway_refund_id)
        .fetch_one(executor)
        .await
    }

    /// All refunds, newest first, with review context
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<RefundListingRow>, sqlx::Error> {
        sqlx::query_as::<_, RefundListingRow>(
            r#"
            SELECT r.*,
                   p.application_id,
                   p.status AS payment_status,
                   p.currency,
                   j.title AS job_title,
                   c.company_name,
                   u.name AS applicant_name,
                   u.email AS applicant_email
            FROM refunds r
            JOIN payments p ON p.id = r.payment_id
            JOIN applications a ON a.id = p.application_id
            JOIN jobs j ON j.id = a.job_id
            JOIN companies c ON c.id = j.company_id
            JOIN job_seekers s ON s.id = a.job_seeker_id
            JOIN users u ON u.id = s.user_id
            ORDER BY r.requested_at DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }
}
