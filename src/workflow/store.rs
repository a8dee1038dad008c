//! Collaborator contracts the engine is written against.

use crate::model::{Employee, LeaveRequest, LeaveStatus, NewLeaveRequest, Role};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write conflict: {0}")]
    Conflict(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::Unavailable(value.to_string())
    }
}

impl From<strum::ParseError> for StoreError {
    fn from(value: strum::ParseError) -> Self {
        StoreError::Corrupt(value.to_string())
    }
}

/// Read-only view of the employee directory.
#[allow(async_fn_in_trait)]
pub trait EmployeeDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError>;
    /// First employee of `department` holding `role`, if any.
    async fn find_by_department_and_role(
        &self,
        department: &str,
        role: Role,
    ) -> Result<Option<Employee>, StoreError>;
    async fn find_all_by_role(&self, role: Role) -> Result<Vec<Employee>, StoreError>;
}

/// Leave-request persistence. Reads here are single atomic calls; every
/// mutation goes through a [`RequestTx`].
#[allow(async_fn_in_trait)]
pub trait RequestStore {
    type Tx: RequestTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;
    /// Newest start date first.
    async fn find_by_applicant(&self, username: &str) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn find_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError>;
}

/// One unit of work. Dropping it without [`RequestTx::commit`] discards
/// every write made through it.
#[allow(async_fn_in_trait)]
pub trait RequestTx {
    /// Serializes concurrent writers for the same applicant until commit.
    async fn lock_applicant(&mut self, username: &str) -> Result<(), StoreError>;
    async fn find_active_by_applicant(
        &mut self,
        username: &str,
    ) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn find_by_id_for_update(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;
    async fn create(&mut self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError>;
    /// Compare-and-set on the status column. `false` when the row was not in
    /// status `from` anymore.
    async fn update_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError>;
    async fn delete(&mut self, id: u64) -> Result<bool, StoreError>;
    async fn commit(self) -> Result<(), StoreError>;
}
