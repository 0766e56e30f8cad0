use actix_web::{
    delete, get, patch, post,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use serde::Serialize;
use uuid::Uuid;

use super::models::{JobFilter, JobPatch, NewJob};
use super::service::JobService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::user::models::Role;
use crate::db::models::JobRow;

#[derive(Serialize)]
struct JobResponse {
    message: String,
    job: JobRow,
}

#[get("")]
async fn list_jobs(
    jobs: Data<JobService>,
    filter: Query<JobFilter>,
) -> Result<HttpResponse, ApiError> {
    let rows = jobs.list(&filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/{id}")]
async fn get_job(jobs: Data<JobService>, id: Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let job = jobs.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("")]
async fn create_job(
    user: AuthUser,
    jobs: Data<JobService>,
    body: Json<NewJob>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    let job = jobs.create(user.id, &body).await?;
    Ok(HttpResponse::Created().json(JobResponse {
        message: "Job created successfully".to_string(),
        job,
    }))
}

#[patch("/{id}")]
async fn update_job(
    user: AuthUser,
    jobs: Data<JobService>,
    id: Path<Uuid>,
    body: Json<JobPatch>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    let job = jobs.update(user.id, id.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

#[delete("/{id}")]
async fn delete_job(
    user: AuthUser,
    jobs: Data<JobService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Company)?;
    jobs.delete(user.id, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Job deleted successfully" })))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
