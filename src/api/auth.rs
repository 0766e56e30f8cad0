//! Caller identity.
//!
//! Sessions and credentials live in the upstream identity layer, which
//! forwards the authenticated user's id in `X-User-Id`. This extractor only
//! resolves that id to a user row and its role.

use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sqlx::{Pool, Postgres};
use tracing::warn;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::user::models::Role;
use crate::db::user_repository::UserRepository;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl AuthUser {
    /// 403 unless the caller has `role`
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            warn!("User {} ({:?}) denied: {:?} required", self.id, self.role, role);
            Err(ApiError::Forbidden("Insufficient role for this action"))
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

fn parse_user_id(req: &HttpRequest) -> Option<Uuid> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = parse_user_id(req);
        let pool = req.app_data::<Data<Pool<Postgres>>>().cloned();

        Box::pin(async move {
            let user_id = user_id.ok_or(ApiError::Unauthorized)?;
            let pool =
                pool.ok_or_else(|| ApiError::Internal("database pool not registered".into()))?;

            let user = UserRepository::find_by_id(pool.get_ref(), user_id)
                .await?
                .ok_or_else(|| {
                    warn!("Unknown user id in {}: {}", USER_ID_HEADER, user_id);
                    ApiError::Unauthorized
                })?;

            Ok(AuthUser {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            name: None,
            role,
        }
    }

    #[test]
    fn role_check() {
        assert!(user(Role::Admin).require(Role::Admin).is_ok());
        assert!(matches!(
            user(Role::Company).require(Role::Admin),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(user(Role::JobSeeker).display_name(), "someone@example.com");
    }

    #[test]
    fn parses_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, format!(" {} ", id)))
            .to_http_request();
        assert_eq!(parse_user_id(&req), Some(id));

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "admin"))
            .to_http_request();
        assert_eq!(parse_user_id(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(parse_user_id(&req), None);
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        let result = AuthUser::from_request(&req, &mut payload).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}
