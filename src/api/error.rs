use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};

use crate::gateway::GatewayError;

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            fields: serde_json::json!({ "message": message.into() }),
        }
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    /// Turn unique-constraint violations into 409 with the given message
    pub fn unique_violation_as(err: sqlx::Error, msg: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::conflict(msg),
            _ => ApiError::Database(err),
        }
    }

    /// Turn foreign-key violations (a referenced row still in use) into 409
    pub fn foreign_key_violation_as(err: sqlx::Error, msg: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => ApiError::conflict(msg),
            _ => ApiError::Database(err),
        }
    }
}

/// `{field: {errors: [message, ...]}}` for each failing field
pub fn field_errors(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    for (field, errors) in errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }
    serde_json::Value::Object(fields)
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::InvalidSignature => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Database(e) => {
                error!("Database error: {:?}", e);
                ErrorResponse::message("Failed to process request", "Database error occurred")
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::message("Failed to process request", "Internal error occurred")
            }
            ApiError::Validation(errors) => {
                warn!("Validation error: {}", errors);
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: field_errors(errors),
                }
            }
            ApiError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                ErrorResponse::message("Bad request", msg.clone())
            }
            ApiError::InvalidSignature => {
                warn!("Rejected payment signature");
                ErrorResponse::message("Signature verification failed", "Invalid signature")
            }
            ApiError::Unauthorized => {
                ErrorResponse::message("Unauthorized", "Authentication required")
            }
            ApiError::Forbidden(msg) => {
                warn!("Forbidden: {}", msg);
                ErrorResponse::message("Forbidden", *msg)
            }
            ApiError::NotFound(what) => {
                ErrorResponse::message("Not found", format!("{} not found", what))
            }
            ApiError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                ErrorResponse::message("Conflict", msg.clone())
            }
            ApiError::Gateway(e) => {
                error!("Payment gateway error: {}", e);
                ErrorResponse::message("Payment gateway error", e.to_string())
            }
            ApiError::NotConfigured(what) => {
                warn!("{} not configured", what);
                ErrorResponse::message("Service unavailable", format!("{} not configured", what))
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn database_errors_hide_details() {
        let (status, body) = body_json(ApiError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["fields"]["message"], "Database error occurred");
    }

    #[actix_web::test]
    async fn maps_client_errors() {
        let (status, body) = body_json(ApiError::NotFound("Application")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["fields"]["message"], "Application not found");

        let (status, _) = body_json(ApiError::conflict("dup")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = body_json(ApiError::InvalidSignature).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = body_json(ApiError::NotConfigured("Stripe")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn non_unique_database_errors_stay_database_errors() {
        let err = ApiError::unique_violation_as(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, ApiError::Database(_)));
        let err = ApiError::foreign_key_violation_as(sqlx::Error::RowNotFound, "in use");
        assert!(matches!(err, ApiError::Database(_)));
    }
}
