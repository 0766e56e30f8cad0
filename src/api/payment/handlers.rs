use actix_web::{
    post,
    web::{scope, Bytes, Data, ServiceConfig},
    HttpRequest, HttpResponse,
};
use actix_web_validator::Json;
use serde::Serialize;

use super::models::{CreatePayment, VerifyRazorpay};
use super::service::PaymentService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;
use crate::db::models::{GuaranteeRow, PaymentRow};

const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

#[derive(Serialize)]
struct VerifiedResponse {
    success: bool,
    message: String,
    payment: PaymentRow,
    guarantee: Option<GuaranteeRow>,
}

#[post("/create-intent")]
async fn create_intent(
    user: AuthUser,
    payments: Data<PaymentService>,
    body: Json<CreatePayment>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    let intent = payments.create_intent(&user, body.application_id).await?;
    Ok(HttpResponse::Ok().json(intent))
}

/// Called by Stripe; authenticated by the signature header, not by a user
#[post("/webhook")]
async fn stripe_webhook(
    req: HttpRequest,
    payments: Data<PaymentService>,
    payload: Bytes,
) -> Result<HttpResponse, ApiError> {
    let signature = req
        .headers()
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    payments.handle_webhook(&payload, signature).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "received": true })))
}

#[post("/create-order")]
async fn create_order(
    user: AuthUser,
    payments: Data<PaymentService>,
    body: Json<CreatePayment>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    let order = payments.create_order(&user, body.application_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[post("/verify")]
async fn verify_payment(
    user: AuthUser,
    payments: Data<PaymentService>,
    body: Json<VerifyRazorpay>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    let (payment, guarantee) = payments.verify_razorpay(&user, &body).await?;
    Ok(HttpResponse::Ok().json(VerifiedResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        payment,
        guarantee,
    }))
}

pub fn payment_config(config: &mut ServiceConfig) {
    config.service(
        scope("/payments")
            .service(create_intent)
            .service(stripe_webhook)
            .service(create_order)
            .service(verify_payment),
    );
}
