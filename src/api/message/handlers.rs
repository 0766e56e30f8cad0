use actix_web::{
    get, post,
    web::{scope, Data, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{MessageQuery, NewMessage};
use super::service::MessageService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;

#[get("")]
async fn list_messages(
    user: AuthUser,
    messages: Data<MessageService>,
    query: Query<MessageQuery>,
) -> Result<HttpResponse, ApiError> {
    let rows = messages.list(&user, query.application_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("")]
async fn post_message(
    user: AuthUser,
    messages: Data<MessageService>,
    body: Json<NewMessage>,
) -> Result<HttpResponse, ApiError> {
    let message = messages.post(&user, &body).await?;
    Ok(HttpResponse::Created().json(message))
}

pub fn message_config(config: &mut ServiceConfig) {
    config.service(scope("/messages").service(list_messages).service(post_message));
}
