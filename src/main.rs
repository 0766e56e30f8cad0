use actix_web::{web, App, HttpServer};
use clap::Parser;
use sqlx::{Pool, Postgres};
use tracing::info;

mod api;
mod cli;
mod config;
mod db;
mod gateway;
mod logging;
mod mail;
mod shutdown;
mod worker;

use crate::api::{
    application::ApplicationService,
    fee::{models::FeeUpdate, FeeService},
    health::health_config,
    job::JobService,
    message::MessageService,
    payment::PaymentService,
    profile::ProfileService,
    refund::RefundService,
    upload::{handlers::download_config, models::MULTIPART_LIMIT_BYTES, UploadService},
    user::UserService,
    validation,
};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::gateway::Gateways;
use crate::mail::Mailer;
use crate::shutdown::ShutdownCoordinator;
use crate::worker::MailWorker;

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().map_err(|e| startup_error("Failed to load configuration", e))?;
    logging::init(&config.log_dir)?;

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    match cli.command() {
        Command::Serve => serve(config, pool).await,
        Command::Migrate => {
            info!("Migrations applied");
            pool.close().await;
            Ok(())
        }
        Command::CreateAdmin { email, name } => {
            // Admin creation sends no mail; the queue has no consumer here
            let (mailer, _) = Mailer::channel(1);
            let admin = UserService::new(pool.clone(), mailer)
                .ensure_admin(&email, name.as_deref())
                .await
                .map_err(|e| startup_error("Failed to create admin", e))?;
            info!("Admin ready: {} ({})", admin.email, admin.id);
            pool.close().await;
            Ok(())
        }
        Command::SetFee { amount_cents } => {
            let fee = FeeService::new(pool.clone(), config.default_fee_cents)
                .update(&FeeUpdate { amount_in_cents: amount_cents }, None)
                .await
                .map_err(|e| startup_error("Failed to set application fee", e))?;
            info!("Application fee is now {} cents", fee.amount_cents);
            pool.close().await;
            Ok(())
        }
    }
}

async fn serve(config: Config, pool: Pool<Postgres>) -> std::io::Result<()> {
    info!("Starting placement-board");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Upload directory: {}", config.upload_dir);
    info!("  - Stripe: {}", if config.stripe.is_some() { "configured" } else { "disabled" });
    info!("  - Razorpay: {}", if config.razorpay.is_some() { "configured" } else { "disabled" });
    info!("  - SMTP: {}", if config.smtp.is_some() { "configured" } else { "log only" });

    // watch channel so the mail worker sees the same shutdown flag as the coordinator
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let (mailer, mail_rx) = Mailer::channel(config.mail_queue_size);
    let mail_worker = MailWorker::new(config.smtp.as_ref(), config.mail_concurrency)
        .map_err(|e| startup_error("Failed to configure SMTP", e))?;
    let mail_handle = tokio::spawn(mail_worker.run(mail_rx, shutdown_rx));

    let gateways = Gateways::from_config(&config)
        .map_err(|e| startup_error("Failed to build HTTP client", e))?;

    let fees = FeeService::new(pool.clone(), config.default_fee_cents);
    let jobs = web::Data::new(JobService::new(pool.clone()));
    let applications = web::Data::new(ApplicationService::new(pool.clone(), mailer.clone()));
    let payments = web::Data::new(PaymentService::new(
        pool.clone(),
        gateways.clone(),
        fees.clone(),
        mailer.clone(),
    ));
    let refunds = web::Data::new(RefundService::new(
        pool.clone(),
        gateways.clone(),
        mailer.clone(),
    ));
    let profiles = web::Data::new(ProfileService::new(pool.clone()));
    let users = web::Data::new(UserService::new(pool.clone(), mailer.clone()));
    let messages = web::Data::new(MessageService::new(pool.clone()));
    let uploads = web::Data::new(UploadService::new(config.upload_dir.clone()));
    let fees = web::Data::new(fees);
    let gateways = web::Data::new(gateways);
    let max_payload_size = config.max_payload_size;

    // Clone pool for the HTTP server; this handle is kept for shutdown
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);
        let multipart_config =
            validation::multipart_config(max_payload_size.max(MULTIPART_LIMIT_BYTES));

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(fees.clone())
            .app_data(jobs.clone())
            .app_data(applications.clone())
            .app_data(payments.clone())
            .app_data(refunds.clone())
            .app_data(profiles.clone())
            .app_data(users.clone())
            .app_data(messages.clone())
            .app_data(uploads.clone())
            .app_data(gateways.clone())
            .app_data(payload_config)
            .app_data(multipart_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(api::api_config)
            .configure(download_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator =
        ShutdownCoordinator::new(server_handle, server_task, mail_handle, shutdown_tx, pool);
    coordinator.wait_for_shutdown().await
}
