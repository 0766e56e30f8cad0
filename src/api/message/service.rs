use sqlx::{Pool, Postgres};
use uuid::Uuid;
use validator::Validate;

use super::models::{NewMessage, SenderType};
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::db::application_repository::ApplicationRepository;
use crate::db::message_repository::MessageRepository;
use crate::db::models::{ApplicationContext, MessageRow};

/// Which side of the application `user_id` is on, if any
pub fn participant(context: &ApplicationContext, user_id: Uuid) -> Option<SenderType> {
    if context.seeker_user_id == user_id {
        Some(SenderType::JobSeeker)
    } else if context.company_user_id == user_id {
        Some(SenderType::Company)
    } else {
        None
    }
}

/// Conversation between a job seeker and the hiring company, per application
#[derive(Clone)]
pub struct MessageService {
    pool: Pool<Postgres>,
}

impl MessageService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        user: &AuthUser,
        application_id: Uuid,
    ) -> Result<Vec<MessageRow>, ApiError> {
        self.sender_type(user, application_id).await?;
        Ok(MessageRepository::list(&self.pool, application_id).await?)
    }

    pub async fn post(
        &self,
        user: &AuthUser,
        message: &NewMessage,
    ) -> Result<MessageRow, ApiError> {
        message.validate()?;
        let content = message.content.trim();
        if content.is_empty() {
            return Err(ApiError::bad_request("Message cannot be empty"));
        }

        let sender_type = self.sender_type(user, message.application_id).await?;
        let row = MessageRepository::create(
            &self.pool,
            message.application_id,
            user.id,
            sender_type,
            content,
        )
        .await?;
        Ok(row)
    }

    async fn sender_type(
        &self,
        user: &AuthUser,
        application_id: Uuid,
    ) -> Result<SenderType, ApiError> {
        ApplicationRepository::context(&self.pool, application_id)
            .await?
            .and_then(|c| participant(&c, user.id))
            .ok_or(ApiError::NotFound("Application"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(seeker: Uuid, company: Uuid) -> ApplicationContext {
        ApplicationContext {
            job_title: "Engineer".into(),
            guarantee_terms: "Interview within 30 days".into(),
            guarantee_period_days: 30,
            company_user_id: company,
            company_email: "hr@acme.example".into(),
            seeker_user_id: seeker,
            seeker_name: None,
            seeker_email: "seeker@example.com".into(),
        }
    }

    #[test]
    fn identifies_participants() {
        let seeker = Uuid::new_v4();
        let company = Uuid::new_v4();
        let ctx = context(seeker, company);
        assert_eq!(participant(&ctx, seeker), Some(SenderType::JobSeeker));
        assert_eq!(participant(&ctx, company), Some(SenderType::Company));
        assert_eq!(participant(&ctx, Uuid::new_v4()), None);
    }
}
