use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::payment::models::PaymentStatus;
use crate::db::models::GuaranteeRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "refund_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Requested,
    UnderReview,
    Approved,
    Rejected,
    Processed,
}

impl RefundStatus {
    /// Admin transitions; REJECTED and PROCESSED are final
    pub fn can_transition_to(self, next: RefundStatus) -> bool {
        use RefundStatus::*;
        matches!(
            (self, next),
            (Requested, UnderReview | Approved | Rejected)
                | (UnderReview, Approved | Rejected)
                | (Approved, Processed)
        )
    }
}

/// Why a refund cannot be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Ineligible {
    #[error("Payment has not been completed")]
    NotPaid,
    #[error("No guarantee exists for this application")]
    NoGuarantee,
    #[error("Guarantee has been fulfilled")]
    Fulfilled,
    #[error("Guarantee period has expired")]
    Expired,
}

/// A refund needs a completed payment and a live, unfulfilled guarantee
pub fn check_eligibility(
    payment_status: PaymentStatus,
    guarantee: Option<&GuaranteeRow>,
    now: DateTime<Utc>,
) -> Result<(), Ineligible> {
    if payment_status != PaymentStatus::Completed {
        return Err(Ineligible::NotPaid);
    }
    let guarantee = guarantee.ok_or(Ineligible::NoGuarantee)?;
    if guarantee.fulfilled {
        return Err(Ineligible::Fulfilled);
    }
    if guarantee.expires_at <= now {
        return Err(Ineligible::Expired);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefundRequest {
    pub application_id: Uuid,
    #[validate(length(min = 10, message = "Please provide a detailed reason (at least 10 characters)"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefundUpdate {
    pub status: RefundStatus,
    #[validate(length(max = 2000, message = "Admin notes must be at most 2000 characters"))]
    pub admin_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use RefundStatus::*;

    fn guarantee(expires_in: Duration, fulfilled: bool) -> GuaranteeRow {
        let now = Utc::now();
        GuaranteeRow {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            terms: "Interview within 30 days".into(),
            expires_at: now + expires_in,
            fulfilled,
            created_at: now,
        }
    }

    #[test]
    fn refund_transitions() {
        assert!(Requested.can_transition_to(Approved));
        assert!(Requested.can_transition_to(UnderReview));
        assert!(UnderReview.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Processed));

        assert!(!Requested.can_transition_to(Processed));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!UnderReview.can_transition_to(Requested));
    }

    #[test]
    fn terminal_refund_states() {
        for to in [Requested, UnderReview, Approved, Rejected, Processed] {
            assert!(!Rejected.can_transition_to(to));
            assert!(!Processed.can_transition_to(to));
        }
    }

    #[test]
    fn eligible_with_live_guarantee() {
        let g = guarantee(Duration::days(10), false);
        assert_eq!(check_eligibility(PaymentStatus::Completed, Some(&g), Utc::now()), Ok(()));
    }

    #[test]
    fn ineligible_cases() {
        let now = Utc::now();
        let live = guarantee(Duration::days(10), false);
        assert_eq!(
            check_eligibility(PaymentStatus::Pending, Some(&live), now),
            Err(Ineligible::NotPaid)
        );
        assert_eq!(
            check_eligibility(PaymentStatus::Refunded, Some(&live), now),
            Err(Ineligible::NotPaid)
        );
        assert_eq!(
            check_eligibility(PaymentStatus::Completed, None, now),
            Err(Ineligible::NoGuarantee)
        );

        let fulfilled = guarantee(Duration::days(10), true);
        assert_eq!(
            check_eligibility(PaymentStatus::Completed, Some(&fulfilled), now),
            Err(Ineligible::Fulfilled)
        );

        let expired = guarantee(Duration::days(-1), false);
        assert_eq!(
            check_eligibility(PaymentStatus::Completed, Some(&expired), now),
            Err(Ineligible::Expired)
        );
    }

    #[test]
    fn reason_must_be_detailed() {
        let request = RefundRequest {
            application_id: Uuid::new_v4(),
            reason: "no job".into(),
        };
        assert!(request.validate().is_err());
    }
}
