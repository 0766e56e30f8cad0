use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Company,
    JobSeeker,
}

fn self_service_role(role: &Role) -> Result<(), ValidationError> {
    match role {
        Role::Admin => Err(ValidationError::new("role")
            .with_message("Role must be COMPANY or JOB_SEEKER".into())),
        _ => Ok(()),
    }
}

/// Self-service registration. Admins are created from the CLI.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(custom(function = "self_service_role"))]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub message: String,
    pub user_id: Uuid,
}
