use actix_web::{
    get, patch, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use serde::Serialize;
use uuid::Uuid;

use super::models::{NewApplication, StatusUpdate};
use super::service::ApplicationService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;
use crate::db::models::ApplicationRow;

#[derive(Serialize)]
struct ApplicationResponse {
    message: String,
    application: ApplicationRow,
}

#[get("")]
async fn list_applications(
    user: AuthUser,
    applications: Data<ApplicationService>,
) -> Result<HttpResponse, ApiError> {
    let rows = applications.list(&user).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("")]
async fn create_application(
    user: AuthUser,
    applications: Data<ApplicationService>,
    body: Json<NewApplication>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    let application = applications.create(&user, &body).await?;
    Ok(HttpResponse::Created().json(ApplicationResponse {
        message: "Application submitted. Complete the payment to activate your guarantee.".to_string(),
        application,
    }))
}

#[get("/{id}")]
async fn get_application(
    user: AuthUser,
    applications: Data<ApplicationService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let detail = applications.detail(&user, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[patch("/{id}")]
async fn update_application_status(
    user: AuthUser,
    applications: Data<ApplicationService>,
    id: Path<Uuid>,
    body: Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    let application = applications.update_status(&user, id.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        message: "Application status updated".to_string(),
        application,
    }))
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/applications")
            .service(list_applications)
            .service(create_application)
            .service(get_application)
            .service(update_application_status),
    );
}
