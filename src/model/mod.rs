pub mod employee;
pub mod leave_request;
pub mod notification;
pub mod role;

pub use employee::{Employee, EmployeeRow};
pub use leave_request::{LeaveKind, LeaveRequest, LeaveRequestRow, LeaveStatus, NewLeaveRequest};
pub use notification::Notification;
pub use role::{Role, RoleSet};
