use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sender_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderType {
    Company,
    JobSeeker,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewMessage {
    pub application_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub application_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_message() {
        let message = NewMessage {
            application_id: Uuid::new_v4(),
            content: String::new(),
        };
        assert!(message.validate().is_err());
    }
}
