use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::models::{check_eligibility, RefundRequest, RefundStatus, RefundUpdate};
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::payment::models::PaymentGateway;
use crate::db::application_repository::ApplicationRepository;
use crate::db::guarantee_repository::GuaranteeRepository;
use crate::db::models::{PaymentRow, RefundListingRow, RefundRow};
use crate::db::payment_repository::PaymentRepository;
use crate::db::refund_repository::RefundRepository;
use crate::gateway::Gateways;
use crate::mail::{templates, Mailer, OutgoingEmail};

const DUPLICATE_REFUND: &str = "A refund has already been requested for this payment";

/// Idempotency key / receipt sent to the gateway; fits Razorpay's 40 character receipt
fn gateway_reference(refund_id: Uuid) -> String {
    format!("refund_{}", refund_id.simple())
}

/// Guarantee refund requests and their admin review
#[derive(Clone)]
pub struct RefundService {
    pool: Pool<Postgres>,
    gateways: Gateways,
    mailer: Mailer,
}

impl RefundService {
    pub fn new(pool: Pool<Postgres>, gateways: Gateways, mailer: Mailer) -> Self {
        Self { pool, gateways, mailer }
    }

    pub async fn request(
        &self,
        user: &AuthUser,
        body: &RefundRequest,
    ) -> Result<RefundRow, ApiError> {
        body.validate()?;

        ApplicationRepository::context(&self.pool, body.application_id)
            .await?
            .filter(|c| c.seeker_user_id == user.id)
            .ok_or(ApiError::NotFound("Application"))?;

        let payment = PaymentRepository::find_by_application(&self.pool, body.application_id)
            .await?
            .ok_or_else(|| ApiError::bad_request("No payment found for this application"))?;

        if RefundRepository::find_by_payment(&self.pool, payment.id).await?.is_some() {
            return Err(ApiError::conflict(DUPLICATE_REFUND));
        }

        let guarantee =
            GuaranteeRepository::find_by_application(&self.pool, body.application_id).await?;
        check_eligibility(payment.status, guarantee.as_ref(), Utc::now()).map_err(|e| {
            warn!("Refund for payment {} refused: {}", payment.id, e);
            ApiError::bad_request(e.to_string())
        })?;

        let reason = body.reason.trim();
        let refund = RefundRepository::create(&self.pool, payment.id, payment.amount_cents, reason)
            .await
            .map_err(|e| ApiError::unique_violation_as(e, DUPLICATE_REFUND))?;

        info!("Refund {} requested for payment {}", refund.id, payment.id);
        Ok(refund)
    }

    pub async fn list(&self) -> Result<Vec<RefundListingRow>, ApiError> {
        Ok(RefundRepository::list(&self.pool).await?)
    }

    /// Admin transition; APPROVED refunds at the gateway, PROCESSED settles the payment
    pub async fn transition(&self, id: Uuid, update: &RefundUpdate) -> Result<RefundRow, ApiError> {
        update.validate()?;
        let notes = update.admin_notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let next = update.status;

        let mut tx = self.pool.begin().await?;

        let refund = RefundRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ApiError::NotFound("Refund"))?;
        if !refund.status.can_transition_to(next) {
            return Err(ApiError::conflict(format!(
                "Cannot move refund from {:?} to {:?}",
                refund.status, next
            )));
        }

        let payment = PaymentRepository::lock(&mut *tx, refund.payment_id)
            .await?
            .ok_or(ApiError::NotFound("Payment"))?;

        let updated = match next {
            RefundStatus::Approved => {
                let gateway_refund_id = self.refund_at_gateway(&payment, &refund).await?;
                info!("Refund {} issued at gateway as {}", id, gateway_refund_id);
                let gateway_refund_id = Some(gateway_refund_id.as_str());
                RefundRepository::update_status(&mut *tx, id, next, notes, gateway_refund_id).await?
            }
            RefundStatus::Processed => {
                PaymentRepository::mark_refunded(&mut *tx, payment.id)
                    .await?
                    .ok_or_else(|| ApiError::conflict("Payment is not in a refundable state"))?;
                RefundRepository::update_status(&mut *tx, id, next, notes, None).await?
            }
            _ => RefundRepository::update_status(&mut *tx, id, next, notes, None).await?,
        };

        tx.commit().await?;
        info!("Refund {} moved {:?} -> {:?}", id, refund.status, next);

        if next == RefundStatus::Processed {
            self.notify_processed(&updated, &payment).await;
        }
        Ok(updated)
    }

    /// Refund the captured amount through the gateway that took it
    ///
    /// Keyed by the refund id, so retrying after a failed commit never
    /// returns the money twice.
    async fn refund_at_gateway(
        &self,
        payment: &PaymentRow,
        refund: &RefundRow,
    ) -> Result<String, ApiError> {
        let reference = gateway_reference(refund.id);
        let amount_cents = refund.amount_cents;
        match payment.gateway {
            Some(PaymentGateway::Stripe) => {
                let stripe = self
                    .gateways
                    .stripe
                    .as_ref()
                    .ok_or(ApiError::NotConfigured("Stripe"))?;
                let intent = payment
                    .stripe_payment_id
                    .as_deref()
                    .ok_or_else(|| {
                        ApiError::Internal(format!("payment {} has no Stripe intent", payment.id))
                    })?;
                Ok(stripe.create_refund(intent, amount_cents, &reference).await?.id)
            }
            Some(PaymentGateway::Razorpay) => {
                let razorpay = self
                    .gateways
                    .razorpay
                    .as_ref()
                    .ok_or(ApiError::NotConfigured("Razorpay"))?;
                let payment_id = payment
                    .razorpay_payment_id
                    .as_deref()
                    .ok_or_else(|| {
                        let reason = format!("payment {} has no Razorpay payment id", payment.id);
                        ApiError::Internal(reason)
                    })?;
                Ok(razorpay.refund_payment(payment_id, amount_cents, &reference).await?.id)
            }
            None => Err(ApiError::Internal(format!("payment {} has no gateway", payment.id))),
        }
    }

    async fn notify_processed(&self, refund: &RefundRow, payment: &PaymentRow) {
        match ApplicationRepository::context_for_payment(&self.pool, payment.id).await {
            Ok(Some(context)) => {
                self.mailer.send(OutgoingEmail::new(
                    context.seeker_email,
                    "Refund Processed",
                    templates::refund_processed(refund.amount_cents, &payment.currency),
                ));
            }
            Ok(None) => warn!("No application found for refunded payment {}", payment.id),
            Err(e) => warn!("Could not load recipient for refund {}: {}", refund.id, e),
        }
    }
}
