use actix_web::{
    get, patch,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{CompanyProfileInput, JobSeekerProfileInput};
use super::service::ProfileService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;

#[get("/company")]
async fn get_company(
    user: AuthUser,
    profiles: Data<ProfileService>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    Ok(HttpResponse::Ok().json(profiles.company(user.id).await?))
}

#[patch("/company")]
async fn update_company(
    user: AuthUser,
    profiles: Data<ProfileService>,
    body: Json<CompanyProfileInput>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    Ok(HttpResponse::Ok().json(profiles.save_company(user.id, &body).await?))
}

#[get("/job-seeker")]
async fn get_job_seeker(
    user: AuthUser,
    profiles: Data<ProfileService>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    Ok(HttpResponse::Ok().json(profiles.job_seeker(user.id).await?))
}

#[patch("/job-seeker")]
async fn update_job_seeker(
    user: AuthUser,
    profiles: Data<ProfileService>,
    body: Json<JobSeekerProfileInput>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::JobSeeker)?;
    Ok(HttpResponse::Ok().json(profiles.save_job_seeker(user.id, &body).await?))
}

pub fn profile_config(config: &mut ServiceConfig) {
    config.service(
        scope("/profile")
            .service(get_company)
            .service(update_company)
            .service(get_job_seeker)
            .service(update_job_seeker),
    );
}
