use actix_web::{
    post,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{NewUser, RegisteredResponse};
use super::service::UserService;
use crate::api::error::ApiError;

#[post("/register")]
async fn register(users: Data<UserService>, body: Json<NewUser>) -> Result<HttpResponse, ApiError> {
    let user = users.register(&body).await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        message: "User created successfully".to_string(),
        user_id: user.id,
    }))
}

pub fn user_config(config: &mut ServiceConfig) {
    config.service(scope("/auth").service(register));
}
