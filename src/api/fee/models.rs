use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::FeeConfigRow;

/// Lowest fee an admin may set, in minor units
pub const MIN_FEE_CENTS: i32 = 100;

/// Render minor units as a two-decimal major amount ("10.00")
pub fn format_amount(cents: i32) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Admin fee update
#[derive(Debug, Deserialize, Validate)]
pub struct FeeUpdate {
    #[validate(range(min = MIN_FEE_CENTS, message = "Amount must be at least $1.00 (100 cents)"))]
    pub amount_in_cents: i32,
}

#[derive(Debug, Serialize)]
pub struct FeeResponse {
    pub amount_in_cents: i32,
    pub amount_in_dollars: String,
}

impl From<FeeConfigRow> for FeeResponse {
    fn from(row: FeeConfigRow) -> Self {
        Self {
            amount_in_cents: row.amount_cents,
            amount_in_dollars: format_amount(row.amount_cents),
        }
    }
}
