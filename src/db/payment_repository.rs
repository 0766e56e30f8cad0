use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::api::payment::models::{Confirmation, PaymentGateway, RazorpayRefs};
use crate::db::models::PaymentRow;

/// Repository for payments (one per application)
pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn find_by_application<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE application_id = $1")
            .bind(application_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_stripe_id<'e, E: PgExecutor<'e>>(
        executor: E,
        stripe_payment_id: &str,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE stripe_payment_id = $1")
            .bind(stripe_payment_id)
            .fetch_optional(executor)
            .await
    }

    /// Lock the payment row until the surrounding transaction ends
    pub async fn lock<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Create the application's payment, or reset a PENDING/FAILED one for a new attempt
    ///
    /// Returns `None` when the existing payment is COMPLETED or REFUNDED, so a
    /// settled payment is never reopened.
    pub async fn upsert_pending<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
        amount_cents: i32,
        currency: &str,
        gateway: PaymentGateway,
        stripe_payment_id: Option<&str>,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        debug!("Upserting pending {:?} payment for application {}", gateway, application_id);

        sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments
                (id, application_id, amount_cents, currency, status, gateway, stripe_payment_id)
            VALUES ($1, $2, $3, $4, 'PENDING', $5, $6)
            ON CONFLICT (application_id) DO UPDATE SET
                amount_cents = EXCLUDED.amount_cents,
                currency = EXCLUDED.currency,
                status = 'PENDING',
                gateway = EXCLUDED.gateway,
                stripe_payment_id = EXCLUDED.stripe_payment_id,
                razorpay_order_id = NULL,
                razorpay_payment_id = NULL,
                razorpay_signature = NULL,
                updated_at = NOW()
            WHERE payments.status IN ('PENDING', 'FAILED')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application_id)
        .bind(amount_cents)
        .bind(currency)
        .bind(gateway)
        .bind(stripe_payment_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn set_razorpay_order<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        order_id: &str,
    ) -> Result<PaymentRow, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments SET razorpay_order_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(order_id)
        .fetch_one(executor)
        .await
    }

    /// Settle the payment with whatever the confirming gateway reported
    ///
    /// A Stripe confirmation records the intent that actually paid, which may
    /// be an older one than the last intent created for this payment.
    pub async fn mark_completed<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        completed_at: DateTime<Utc>,
        confirmation: &Confirmation<'_>,
    ) -> Result<PaymentRow, sqlx::Error> {
        let (razorpay, stripe_intent) = match confirmation {
            Confirmation::Razorpay(refs) => (Some(*refs), None),
            Confirmation::Stripe(intent) => (None, Some(*intent)),
        };

        sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments SET
                status = 'COMPLETED',
                completed_at = $2,
                razorpay_payment_id = COALESCE($3, razorpay_payment_id),
                razorpay_signature = COALESCE($4, razorpay_signature),
                stripe_payment_id = COALESCE($5, stripe_payment_id),
                gateway = CASE
                    WHEN $5::text IS NULL THEN gateway
                    ELSE 'STRIPE'::payment_gateway
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(completed_at)
        .bind(razorpay.map(|r| r.payment_id.as_str()))
        .bind(razorpay.map(|r| r.signature.as_str()))
        .bind(stripe_intent)
        .fetch_one(executor)
        .await
    }

    /// PENDING → FAILED. Returns `None` if the payment was in any other state.
    pub async fn mark_failed<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        razorpay: Option<&RazorpayRefs>,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments SET
                status = 'FAILED',
                razorpay_payment_id = COALESCE($2, razorpay_payment_id),
                razorpay_signature = COALESCE($3, razorpay_signature),
                updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(razorpay.map(|r| r.payment_id.as_str()))
        .bind(razorpay.map(|r| r.signature.as_str()))
        .fetch_optional(executor)
        .await
    }

    /// COMPLETED → REFUNDED. Returns `None` if the payment was not COMPLETED.
    pub async fn mark_refunded<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<PaymentRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments SET status = 'REFUNDED', updated_at = NOW()
            WHERE id = $1 AND status = 'COMPLETED'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
