//! Leave-request workflow: admission checks, the approval state machine and
//! the collaborator contracts it runs against.

pub mod balance;
pub mod clock;
pub mod engine;
pub mod error;
pub mod memory;
pub mod notify;
pub mod overlap;
pub mod policy;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use balance::{
    BalanceCalculator, EntitlementRule, FixedEntitlement, LeaveBalance, LeaveDays,
    StatutoryEntitlement,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{LeaveApplication, WorkflowEngine, WorkflowOutcome};
pub use error::{Denial, RuleViolation, WorkflowError};
pub use notify::{Inbox, NotificationDispatcher, NotificationIntent, Notifier, NotifyError};
pub use policy::{ApprovalAction, ApprovalPolicy, Decision};
pub use store::{EmployeeDirectory, RequestStore, RequestTx, StoreError};
