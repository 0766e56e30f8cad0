//! Row types returned by the repositories.
//!
//! Listing rows flatten a base row with joined display columns; both the
//! `FromRow` and the JSON shapes stay flat.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::application::models::ApplicationStatus;
use crate::api::job::models::JobStatus;
use crate::api::message::models::SenderType;
use crate::api::payment::models::{PaymentGateway, PaymentStatus};
use crate::api::refund::models::RefundStatus;
use crate::api::user::models::Role;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
    pub logo: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobSeekerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<i32>,
    pub education: Option<String>,
    pub bio: Option<String>,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile plus the owning user's name and email
#[derive(Debug, FromRow, Serialize)]
pub struct CompanyProfileRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub company: CompanyRow,
    pub user_name: Option<String>,
    pub user_email: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct JobSeekerProfileRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job_seeker: JobSeekerRow,
    pub user_name: Option<String>,
    pub user_email: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub category: String,
    pub location: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub guarantee_terms: String,
    pub guarantee_period_days: i32,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job with the public company details shown on listings
#[derive(Debug, FromRow, Serialize)]
pub struct JobListingRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub company_location: Option<String>,
    pub company_website: Option<String>,
    pub company_verified: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_seeker_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application as listed on dashboards
#[derive(Debug, FromRow, Serialize)]
pub struct ApplicationSummaryRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub company_name: String,
    pub applicant_name: Option<String>,
    pub applicant_email: String,
    pub payment_status: Option<PaymentStatus>,
}

/// Everything the payment and status flows need to know about an application
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationContext {
    pub job_title: String,
    pub guarantee_terms: String,
    pub guarantee_period_days: i32,
    pub company_user_id: Uuid,
    pub company_email: String,
    pub seeker_user_id: Uuid,
    pub seeker_name: Option<String>,
    pub seeker_email: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub amount_cents: i32,
    pub currency: String,
    pub status: PaymentStatus,
    pub gateway: Option<PaymentGateway>,
    pub stripe_payment_id: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    #[serde(skip_serializing)]
    pub razorpay_signature: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuaranteeRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub payment_id: Uuid,
    pub terms: String,
    pub expires_at: DateTime<Utc>,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RefundRow {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount_cents: i32,
    pub reason: String,
    pub status: RefundStatus,
    pub admin_notes: Option<String>,
    pub gateway_refund_id: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Refund with the context an admin reviews it in
#[derive(Debug, FromRow, Serialize)]
pub struct RefundListingRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub refund: RefundRow,
    pub application_id: Uuid,
    pub payment_status: PaymentStatus,
    pub currency: String,
    pub job_title: String,
    pub company_name: String,
    pub applicant_name: Option<String>,
    pub applicant_email: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeeConfigRow {
    pub amount_cents: i32,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub sender_id: Uuid,
    pub sender_type: SenderType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
