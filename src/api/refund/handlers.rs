use actix_web::{
    get, patch, post,
    web::{Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use serde::Serialize;
use uuid::Uuid;

use super::models::{RefundRequest, RefundUpdate};
use super::service::RefundService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;
use crate::db::models::RefundRow;

#[derive(Serialize)]
struct RefundResponse {
    message: String,
    refund: RefundRow,
}

#[post("/refunds")]
async fn request_refund(
    user: AuthUser,
    refunds: Data<RefundService>,
    body: Json<RefundRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    let refund = refunds.request(&user, &body).await?;
    Ok(HttpResponse::Created().json(RefundResponse {
        message: "Refund request submitted".to_string(),
        refund,
    }))
}

#[get("/admin/refunds")]
async fn list_refunds(
    user: AuthUser,
    refunds: Data<RefundService>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Admin)?;
    let rows = refunds.list().await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[patch("/admin/refunds/{id}")]
async fn update_refund(
    user: AuthUser,
    refunds: Data<RefundService>,
    id: Path<Uuid>,
    body: Json<RefundUpdate>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Admin)?;
    let refund = refunds.transition(id.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(RefundResponse {
        message: "Refund updated".to_string(),
        refund,
    }))
}

pub fn refund_config(config: &mut ServiceConfig) {
    config
        .service(request_refund)
        .service(list_refunds)
        .service(update_refund);
}
