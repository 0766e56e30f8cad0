use sqlx::PgExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::api::user::models::Role;
use crate::db::models::UserRow;

/// Repository for user identity rows
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_email<'e, E: PgExecutor<'e>>(
        executor: E,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        email: &str,
        name: Option<&str>,
        role: Role,
    ) -> Result<UserRow, sqlx::Error> {
        debug!("Creating user: email={}, role={:?}", email, role);

        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(role)
        .fetch_one(executor)
        .await
    }

    pub async fn set_role<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        role: Role,
    ) -> Result<UserRow, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_one(executor)
        .await
    }
}
