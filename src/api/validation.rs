use actix_multipart::form::MultipartFormConfig;
use actix_web::HttpResponse;

use crate::api::error::{field_errors, ErrorResponse};

fn bad_request(error: &str, fields: serde_json::Value) -> actix_web::Error {
    let error_response = ErrorResponse {
        error: error.to_string(),
        fields,
    };
    let response = HttpResponse::BadRequest().json(error_response);
    actix_web::error::InternalError::from_response("", response).into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                bad_request("Validation failed", field_errors(&validation_errors))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("unknown variant") {
                    "Invalid enum value. Check allowed values for this field"
                } else if err_string.contains("missing field") {
                    "A required field is missing"
                } else {
                    "Invalid JSON format"
                };
                bad_request("Request validation failed", serde_json::json!({ "message": message }))
            }
            _ => bad_request(
                "Validation failed",
                serde_json::json!({ "message": "Validation error" }),
            ),
        }
    })
}

/// Multipart limits with the same JSON error body as JSON requests
pub fn multipart_config(total_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(total_limit)
        .error_handler(|err, _req| {
            bad_request("Invalid upload", serde_json::json!({ "message": err.to_string() }))
        })
}
