use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{ApplicationRow, GuaranteeRow, PaymentRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    InterviewScheduled,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Company-driven transitions; ACCEPTED and REJECTED are final
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview | InterviewScheduled | Accepted | Rejected)
                | (UnderReview, InterviewScheduled | Accepted | Rejected)
                | (InterviewScheduled, Accepted | Rejected)
        )
    }

    pub fn is_final(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewApplication {
    pub job_id: Uuid,
    #[validate(length(max = 5000, message = "Cover letter must be at most 5000 characters"))]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// Application with its payment and guarantee, when present
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub payment: Option<PaymentRow>,
    pub guarantee: Option<GuaranteeRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    const ALL: [ApplicationStatus; 5] =
        [Submitted, UnderReview, InterviewScheduled, Accepted, Rejected];

    #[test]
    fn forward_transitions() {
        assert!(Submitted.can_transition_to(UnderReview));
        assert!(Submitted.can_transition_to(Accepted));
        assert!(UnderReview.can_transition_to(InterviewScheduled));
        assert!(InterviewScheduled.can_transition_to(Rejected));
    }

    #[test]
    fn no_backwards_or_self_transitions() {
        assert!(!UnderReview.can_transition_to(Submitted));
        assert!(!InterviewScheduled.can_transition_to(UnderReview));
        for status in ALL {
            assert!(!status.can_transition_to(status));
            assert!(!status.can_transition_to(Submitted));
        }
    }

    #[test]
    fn final_states_are_terminal() {
        for from in [Accepted, Rejected] {
            assert!(from.is_final());
            for to in ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn wire_format() {
        let update: StatusUpdate = serde_json::from_str(r#"{"status":"INTERVIEW_SCHEDULED"}"#).unwrap();
        assert_eq!(update.status, InterviewScheduled);
    }
}
