use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::models::{ApplicationDetail, ApplicationStatus, NewApplication};
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::job::models::JobStatus;
use crate::api::user::models::Role;
use crate::db::application_repository::ApplicationRepository;
use crate::db::guarantee_repository::GuaranteeRepository;
use crate::db::job_repository::JobRepository;
use crate::db::models::{ApplicationContext, ApplicationRow, ApplicationSummaryRow};
use crate::db::payment_repository::PaymentRepository;
use crate::db::profile_repository::ProfileRepository;
use crate::mail::{templates, Mailer, OutgoingEmail};

const DUPLICATE_APPLICATION: &str = "You have already applied to this job";

#[derive(Clone)]
pub struct ApplicationService {
    pool: Pool<Postgres>,
    mailer: Mailer,
}

impl ApplicationService {
    pub fn new(pool: Pool<Postgres>, mailer: Mailer) -> Self {
        Self { pool, mailer }
    }

    /// Submit an application; payment follows as a separate step
    pub async fn create(
        &self,
        user: &AuthUser,
        new: &NewApplication,
    ) -> Result<ApplicationRow, ApiError> {
        new.validate()?;

        let seeker = ProfileRepository::job_seeker_for_user(&self.pool, user.id)
            .await?
            .ok_or(ApiError::NotFound("Job seeker profile"))?;
        let job = JobRepository::find(&self.pool, new.job_id)
            .await?
            .ok_or(ApiError::NotFound("Job"))?;
        if job.status != JobStatus::Active {
            return Err(ApiError::bad_request("Job is not accepting applications"));
        }

        if ApplicationRepository::exists_for(&self.pool, job.id, seeker.id).await? {
            return Err(ApiError::conflict(DUPLICATE_APPLICATION));
        }

        let cover_letter = new.cover_letter.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let application = ApplicationRepository::create(&self.pool, job.id, seeker.id, cover_letter)
            .await
            .map_err(|e| ApiError::unique_violation_as(e, DUPLICATE_APPLICATION))?;

        info!("Application {} submitted for job {}", application.id, job.id);
        Ok(application)
    }

    /// Applications visible to the caller's role
    pub async fn list(&self, user: &AuthUser) -> Result<Vec<ApplicationSummaryRow>, ApiError> {
        let rows = match user.role {
            Role::JobSeeker => {
                match ProfileRepository::job_seeker_for_user(&self.pool, user.id).await? {
                    Some(seeker) => {
                        ApplicationRepository::list_for_job_seeker(&self.pool, seeker.id).await?
                    }
                    None => Vec::new(),
                }
            }
            Role::Company => match ProfileRepository::company_for_user(&self.pool, user.id).await? {
                Some(company) => {
                    ApplicationRepository::list_for_company(&self.pool, company.id).await?
                }
                None => Vec::new(),
            },
            Role::Admin => ApplicationRepository::list_all(&self.pool).await?,
        };
        Ok(rows)
    }

    pub async fn detail(&self, user: &AuthUser, id: Uuid) -> Result<ApplicationDetail, ApiError> {
        let context = self.visible_context(user, id).await?;

        let application = ApplicationRepository::find(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound("Application"))?;
        let payment = PaymentRepository::find_by_application(&self.pool, id).await?;
        let guarantee = GuaranteeRepository::find_by_application(&self.pool, id).await?;

        Ok(ApplicationDetail {
            application,
            job_title: context.job_title,
            payment,
            guarantee,
        })
    }

    /// Company moves an application forward; ACCEPTED fulfils the guarantee
    pub async fn update_status(
        &self,
        user: &AuthUser,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<ApplicationRow, ApiError> {
        let context = ApplicationRepository::context(&self.pool, id)
            .await?
            .filter(|c| c.company_user_id == user.id)
            .ok_or(ApiError::NotFound("Application"))?;

        let mut tx = self.pool.begin().await?;

        let current = ApplicationRepository::lock_status(&mut *tx, id)
            .await?
            .ok_or(ApiError::NotFound("Application"))?;
        if current.is_final() {
            return Err(ApiError::conflict(format!("Application is already {}", current.label())));
        }
        if !current.can_transition_to(next) {
            warn!("Application {}: rejected transition {:?} -> {:?}", id, current, next);
            return Err(ApiError::conflict(format!(
                "Cannot change application status from {} to {}",
                current.label(),
                next.label()
            )));
        }

        let application = ApplicationRepository::set_status(&mut *tx, id, next).await?;
        if next == ApplicationStatus::Accepted
            && GuaranteeRepository::mark_fulfilled(&mut *tx, id).await?
        {
            info!("Guarantee for application {} fulfilled", id);
        }

        tx.commit().await?;
        info!("Application {} moved {:?} -> {:?}", id, current, next);

        self.mailer.send(OutgoingEmail::new(
            context.seeker_email.clone(),
            "Application Status Update",
            templates::application_status_update(&context.job_title, next.label()),
        ));

        Ok(application)
    }

    /// The owning seeker, the owning company and admins may see an application
    async fn visible_context(
        &self,
        user: &AuthUser,
        id: Uuid,
    ) -> Result<ApplicationContext, ApiError> {
        ApplicationRepository::context(&self.pool, id)
            .await?
            .filter(|c| {
                user.role == Role::Admin
                    || c.seeker_user_id == user.id
                    || c.company_user_id == user.id
            })
            .ok_or(ApiError::NotFound("Application"))
    }
}
