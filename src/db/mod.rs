pub mod application_repository;
pub mod connection;
pub mod fee_repository;
pub mod guarantee_repository;
pub mod job_repository;
pub mod message_repository;
pub mod migrations;
pub mod models;
pub mod payment_repository;
pub mod profile_repository;
pub mod refund_repository;
#[cfg(test)]
pub mod test_db;
pub mod user_repository;
