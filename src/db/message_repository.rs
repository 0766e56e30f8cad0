use sqlx::PgExecutor;
use uuid::Uuid;

use crate::api::message::models::SenderType;
use crate::db::models::MessageRow;

/// Repository for application messages
pub struct MessageRepository;

impl MessageRepository {
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
    ) -> Result<Vec<MessageRow>, sqlx::Error> {
        sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE application_id = $1 ORDER BY created_at ASC",
        )
        .bind(application_id)
        .fetch_all(executor)
        .await
    }

    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        application_id: Uuid,
        sender_id: Uuid,
        sender_type: SenderType,
        content: &str,
    ) -> Result<MessageRow, sqlx::Error> {
        sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, application_id, sender_id, sender_type, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application_id)
        .bind(sender_id)
        .bind(sender_type)
        .bind(content)
        .fetch_one(executor)
        .await
    }
}
