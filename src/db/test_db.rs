//! Throwaway Postgres databases for tests.
//!
//! Each [`TestDb`] is a fresh database created on the server named by
//! `TEST_DATABASE_URL` (a URL ending in a database path), migrated on
//! creation and dropped by [`TestDb::cleanup`]. Without that variable the
//! database-backed tests return early.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::job::models::{JobStatus, NewJob};
use crate::api::payment::models::{guarantee_expiry, Confirmation, PaymentGateway};
use crate::api::user::models::Role;
use crate::db::application_repository::ApplicationRepository;
use crate::db::guarantee_repository::GuaranteeRepository;
use crate::db::job_repository::JobRepository;
use crate::db::migrations::run_migrations;
use crate::db::models::{ApplicationRow, CompanyRow, JobRow, JobSeekerRow, PaymentRow};
use crate::db::payment_repository::PaymentRepository;
use crate::db::profile_repository::ProfileRepository;
use crate::db::user_repository::UserRepository;

static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

pub struct TestDb {
    server_url: String,
    name: String,
    pub pool: Pool<Postgres>,
}

impl TestDb {
    /// `None` when `TEST_DATABASE_URL` is not set
    pub async fn new() -> Option<Self> {
        dotenv::dotenv().ok();
        let server_url = std::env::var("TEST_DATABASE_URL").ok().filter(|u| !u.trim().is_empty())?;

        let name = format!(
            "placement_test_{}_{}",
            std::process::id(),
            TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to TEST_DATABASE_URL");
        sqlx::raw_sql(&format!("CREATE DATABASE {}", name))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");
        conn.close().await.ok();

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url(&server_url, &name))
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to migrate test database");

        Some(Self { server_url, name, pool })
    }

    /// Close the pool and drop the database. Skipped on panic, so a failing
    /// test leaves its database behind for inspection.
    pub async fn cleanup(self) {
        self.pool.close().await;
        if let Ok(mut conn) = PgConnection::connect(&self.server_url).await {
            let sql = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name);
            let dropped = sqlx::raw_sql(&sql).execute(&mut conn).await;
            if let Err(e) = dropped {
                eprintln!("Failed to drop test database {}: {}", self.name, e);
            }
        }
    }
}

/// Same server and options, different database
fn database_url(server_url: &str, name: &str) -> String {
    let (base, query) = match server_url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (server_url, None),
    };
    let root = base.rsplit_once('/').map_or(base, |(root, _)| root);
    match query {
        Some(query) => format!("{}/{}?{}", root, name, query),
        None => format!("{}/{}", root, name),
    }
}

pub async fn user(pool: &Pool<Postgres>, role: Role) -> AuthUser {
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    let row = UserRepository::create(pool, &email, Some("Test User"), role)
        .await
        .expect("Failed to create user");
    AuthUser {
        id: row.id,
        email: row.email,
        name: row.name,
        role: row.role,
    }
}

pub async fn company(pool: &Pool<Postgres>) -> (AuthUser, CompanyRow) {
    let user = user(pool, Role::Company).await;
    let company = ProfileRepository::create_company(pool, user.id, "Acme Hiring")
        .await
        .expect("Failed to create company");
    (user, company)
}

pub async fn job_seeker(pool: &Pool<Postgres>) -> (AuthUser, JobSeekerRow) {
    let user = user(pool, Role::JobSeeker).await;
    let seeker = ProfileRepository::create_job_seeker(pool, user.id)
        .await
        .expect("Failed to create job seeker");
    (user, seeker)
}

pub async fn job(pool: &Pool<Postgres>, company_id: Uuid, guarantee_period_days: i32) -> JobRow {
    let new_job = NewJob {
        title: "Backend Engineer".into(),
        description: "Build and run the payment services".into(),
        requirements: "Three years of Rust".into(),
        category: "Engineering".into(),
        location: "Remote".into(),
        salary_min: Some(90_000),
        salary_max: Some(120_000),
        guarantee_terms: "Interview within the guarantee period".into(),
        guarantee_period_days,
        status: Some(JobStatus::Active),
    };
    JobRepository::create(pool, company_id, &new_job)
        .await
        .expect("Failed to create job")
}

/// A company, its job and one seeker's application to it
pub struct Seeded {
    pub company: AuthUser,
    pub seeker: AuthUser,
    pub job: JobRow,
    pub application: ApplicationRow,
}

pub async fn application(pool: &Pool<Postgres>, guarantee_period_days: i32) -> Seeded {
    let (company_user, company) = company(pool).await;
    let (seeker_user, seeker) = job_seeker(pool).await;
    let job = job(pool, company.id, guarantee_period_days).await;
    let application = ApplicationRepository::create(pool, job.id, seeker.id, None)
        .await
        .expect("Failed to create application");
    Seeded {
        company: company_user,
        seeker: seeker_user,
        job,
        application,
    }
}

/// Application whose Stripe payment is COMPLETED with a live guarantee
pub async fn paid_application(pool: &Pool<Postgres>) -> (Seeded, PaymentRow) {
    let seeded = application(pool, 30).await;
    let intent = format!("pi_{}", Uuid::new_v4().simple());
    let payment = PaymentRepository::upsert_pending(
        pool,
        seeded.application.id,
        1000,
        "usd",
        PaymentGateway::Stripe,
        Some(&intent),
    )
    .await
    .expect("Failed to create payment")
    .expect("Payment already settled");

    let completed_at = Utc::now();
    let confirmation = Confirmation::Stripe(&intent);
    let payment = PaymentRepository::mark_completed(pool, payment.id, completed_at, &confirmation)
        .await
        .expect("Failed to complete payment");
    GuaranteeRepository::create(
        pool,
        seeded.application.id,
        payment.id,
        &seeded.job.guarantee_terms,
        guarantee_expiry(completed_at, seeded.job.guarantee_period_days),
    )
    .await
    .expect("Failed to create guarantee");

    (seeded, payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_database_name() {
        assert_eq!(
            database_url("postgres://u:p@localhost:5432/postgres", "t1"),
            "postgres://u:p@localhost:5432/t1"
        );
        assert_eq!(
            database_url("postgres://u:p@db/postgres?sslmode=disable", "t2"),
            "postgres://u:p@db/t2?sslmode=disable"
        );
    }
}
