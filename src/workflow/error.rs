use chrono::NaiveDate;

use super::balance::LeaveDays;
use super::store::StoreError;

/// Why an actor may not perform a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("no permission to process this request")]
    NoPermission,
    #[error("request has already been processed")]
    AlreadyProcessed,
    #[error("only the applicant may cancel a request")]
    NotApplicant,
}

/// Business rules gating admission of a new request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("leave cannot start in the past ({start} is before {today})")]
    PastStartDate { start: NaiveDate, today: NaiveDate },
    #[error("annual leave is available after 3 months of service (hired {hire_date})")]
    TenureTooShort { hire_date: NaiveDate },
    #[error("an active leave request already covers {start}..{end}")]
    Overlap { start: NaiveDate, end: NaiveDate },
    #[error("annual leave balance exceeded: {remaining} day(s) remaining")]
    BalanceExceeded { remaining: LeaveDays },
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error(transparent)]
    PolicyDenied(#[from] Denial),
    #[error(transparent)]
    BusinessRule(#[from] RuleViolation),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl WorkflowError {
    pub fn employee_not_found(username: &str) -> Self {
        WorkflowError::NotFound {
            entity: "employee",
            key: username.to_string(),
        }
    }

    pub fn request_not_found(id: u64) -> Self {
        WorkflowError::NotFound {
            entity: "leave request",
            key: id.to_string(),
        }
    }
}
