use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_gateway", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentGateway {
    Stripe,
    Razorpay,
}

/// What completing a payment in `status` amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Mark COMPLETED and issue the guarantee
    Complete,
    /// Already COMPLETED; repeated webhooks and verifications land here
    AlreadyDone,
    /// Refunded payments never complete again
    Refunded,
}

impl PaymentStatus {
    pub fn completion(self) -> Completion {
        match self {
            PaymentStatus::Pending | PaymentStatus::Failed => Completion::Complete,
            PaymentStatus::Completed => Completion::AlreadyDone,
            PaymentStatus::Refunded => Completion::Refunded,
        }
    }

    /// A new intent or order may only be started for an unsettled payment
    pub fn can_initiate(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Failed)
    }
}

/// End of the guarantee window
pub fn guarantee_expiry(completed_at: DateTime<Utc>, period_days: i32) -> DateTime<Utc> {
    completed_at + Duration::days(i64::from(period_days))
}

/// Body of create-intent and create-order
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayment {
    pub application_id: Uuid,
}

/// Razorpay checkout result posted back by the client
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRazorpay {
    #[validate(length(min = 1, message = "razorpay_order_id is required"))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1, message = "razorpay_payment_id is required"))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1, message = "razorpay_signature is required"))]
    pub razorpay_signature: String,
    pub application_id: Uuid,
}

/// Gateway references stored on the payment row after verification
#[derive(Debug, Clone)]
pub struct RazorpayRefs {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl From<&VerifyRazorpay> for RazorpayRefs {
    fn from(body: &VerifyRazorpay) -> Self {
        Self {
            order_id: body.razorpay_order_id.clone(),
            payment_id: body.razorpay_payment_id.clone(),
            signature: body.razorpay_signature.clone(),
        }
    }
}

/// The gateway evidence a payment is completed with
#[derive(Debug, Clone, Copy)]
pub enum Confirmation<'a> {
    /// Verified checkout signature
    Razorpay(&'a RazorpayRefs),
    /// Intent id from a signed `payment_intent.succeeded` event
    Stripe(&'a str),
}

#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub client_secret: Option<String>,
    pub payment_id: Uuid,
    pub amount: i32,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub payment_id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub key_id: String,
    pub job_title: String,
    pub prefill: Prefill,
}
