use sqlx::{Pool, Postgres};
use tracing::info;

/// Run all pending database migrations
///
/// SQL files under `migrations/` are embedded at compile time; sqlx records
/// applied versions, so this is safe to run on every start.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
