pub mod application;
pub mod auth;
pub mod error;
pub mod fee;
pub mod health;
pub mod job;
pub mod message;
pub mod payment;
pub mod profile;
pub mod refund;
pub mod upload;
pub mod user;
pub mod validation;

use actix_web::web::{scope, ServiceConfig};

/// Every JSON route, mounted under `/api`
pub fn api_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api")
            .configure(fee::handlers::fee_config)
            .configure(job::handlers::job_config)
            .configure(application::handlers::application_config)
            .configure(payment::handlers::payment_config)
            .configure(refund::handlers::refund_config)
            .configure(profile::handlers::profile_config)
            .configure(user::handlers::user_config)
            .configure(message::handlers::message_config)
            .configure(upload::handlers::upload_config),
    );
}
