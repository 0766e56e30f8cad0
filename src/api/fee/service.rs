use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::FeeUpdate;
use crate::api::error::ApiError;
use crate::db::fee_repository::FeeRepository;
use crate::db::models::FeeConfigRow;

/// Owns the singleton application fee
#[derive(Clone)]
pub struct FeeService {
    pool: Pool<Postgres>,
    default_cents: i32,
}

impl FeeService {
    pub fn new(pool: Pool<Postgres>, default_cents: i32) -> Self {
        Self { pool, default_cents }
    }

    /// Current fee, creating the row with the default on first read
    pub async fn current(&self) -> Result<FeeConfigRow, ApiError> {
        Ok(FeeRepository::get_or_init(&self.pool, self.default_cents).await?)
    }

    /// Replace the fee amount; `updated_by` is absent when set from the CLI
    pub async fn update(
        &self,
        update: &FeeUpdate,
        updated_by: Option<Uuid>,
    ) -> Result<FeeConfigRow, ApiError> {
        update.validate()?;
        let row = FeeRepository::set(&self.pool, update.amount_in_cents, updated_by).await?;
        info!("Application fee set to {} cents", row.amount_cents);
        Ok(row)
    }
}
