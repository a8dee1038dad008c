//! MySQL-backed collaborators for the workflow engine.

pub mod employee_directory;
pub mod leave_store;
pub mod notification;

use crate::api::LeaveBackend;
use crate::workflow::{NotificationDispatcher, StoreError, SystemClock, WorkflowEngine};

pub use employee_directory::SqlEmployeeDirectory;
pub use leave_store::{SqlLeaveStore, SqlLeaveTx};
pub use notification::SqlNotifier;

pub type LeaveEngine = WorkflowEngine<SqlEmployeeDirectory, SqlLeaveStore, SystemClock>;
pub type LeaveDispatcher = NotificationDispatcher<SqlNotifier>;

/// Production wiring of the HTTP layer.
pub struct MySqlBackend;

impl LeaveBackend for MySqlBackend {
    type Directory = SqlEmployeeDirectory;
    type Store = SqlLeaveStore;
    type Clock = SystemClock;
    type Notifier = SqlNotifier;
}

/// Deadlock victims become conflicts the caller may retry.
pub(crate) fn classify(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("40001") {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    StoreError::from(e)
}
