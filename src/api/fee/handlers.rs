use actix_web::{
    get, patch,
    web::{Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use serde::Serialize;

use super::models::{FeeResponse, FeeUpdate};
use super::service::FeeService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;

#[derive(Serialize)]
struct FeeUpdatedResponse {
    success: bool,
    #[serde(flatten)]
    fee: FeeResponse,
}

/// Public: the fee a job seeker will be charged
#[get("/application-fee")]
async fn get_fee(fees: Data<FeeService>) -> Result<HttpResponse, ApiError> {
    let fee = fees.current().await?;
    Ok(HttpResponse::Ok().json(FeeResponse::from(fee)))
}

#[get("/admin/application-fee")]
async fn admin_get_fee(user: AuthUser, fees: Data<FeeService>) -> Result<HttpResponse, ApiError> {
    user.require(Role::Admin)?;
    let fee = fees.current().await?;
    Ok(HttpResponse::Ok().json(FeeResponse::from(fee)))
}

#[patch("/admin/application-fee")]
async fn admin_update_fee(
    user: AuthUser,
    fees: Data<FeeService>,
    body: Json<FeeUpdate>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Admin)?;
    let fee = fees.update(&body, Some(user.id)).await?;
    Ok(HttpResponse::Ok().json(FeeUpdatedResponse {
        success: true,
        fee: fee.into(),
    }))
}

pub fn fee_config(config: &mut ServiceConfig) {
    config
        .service(get_fee)
        .service(admin_get_fee)
        .service(admin_update_fee);
}
