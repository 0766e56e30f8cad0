use sqlx::{Pool, Postgres};
use tracing::info;
use validator::Validate;

use super::models::{NewUser, Role};
use crate::api::error::ApiError;
use crate::db::models::UserRow;
use crate::db::profile_repository::ProfileRepository;
use crate::db::user_repository::UserRepository;
use crate::mail::{templates, Mailer, OutgoingEmail};

const DUPLICATE_USER: &str = "User already exists";

#[derive(Clone)]
pub struct UserService {
    pool: Pool<Postgres>,
    mailer: Mailer,
}

impl UserService {
    pub fn new(pool: Pool<Postgres>, mailer: Mailer) -> Self {
        Self { pool, mailer }
    }

    /// Create a user together with its company or job seeker profile
    pub async fn register(&self, new_user: &NewUser) -> Result<UserRow, ApiError> {
        new_user.validate()?;
        let email = new_user.email.trim().to_lowercase();

        if UserRepository::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(ApiError::conflict(DUPLICATE_USER));
        }

        let user = self
            .create_with_profile(&email, Some(new_user.name.trim()), new_user.role)
            .await?;

        info!("Registered {:?} user {}", user.role, user.id);
        self.mailer.send(OutgoingEmail::new(
            user.email.clone(),
            "Welcome to JobPortal Pro",
            templates::welcome(user.name.as_deref().unwrap_or("there")),
        ));

        Ok(user)
    }

    /// Create an admin, or promote an existing user to admin
    pub async fn ensure_admin(&self, email: &str, name: Option<&str>) -> Result<UserRow, ApiError> {
        let email = email.trim().to_lowercase();
        match UserRepository::find_by_email(&self.pool, &email).await? {
            Some(existing) if existing.role == Role::Admin => Ok(existing),
            Some(existing) => {
                Ok(UserRepository::set_role(&self.pool, existing.id, Role::Admin).await?)
            }
            None => self.create_with_profile(&email, name, Role::Admin).await,
        }
    }

    async fn create_with_profile(
        &self,
        email: &str,
        name: Option<&str>,
        role: Role,
    ) -> Result<UserRow, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::create(&mut *tx, email, name, role)
            .await
            .map_err(|e| ApiError::unique_violation_as(e, DUPLICATE_USER))?;

        match role {
            Role::Company => {
                ProfileRepository::create_company(&mut *tx, user.id, name.unwrap_or(email)).await?;
            }
            Role::JobSeeker => {
                ProfileRepository::create_job_seeker(&mut *tx, user.id).await?;
            }
            Role::Admin => {}
        }

        tx.commit().await?;
        Ok(user)
    }
}
