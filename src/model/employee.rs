use chrono::NaiveDate;
use serde::Serialize;

use super::role::RoleSet;

/// Directory entry for an employee. The workflow only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: u64,
    pub username: String,
    pub hire_date: NaiveDate,
    pub department: String,
    pub roles: RoleSet,
}

/// Raw `employees` row; roles are still the comma-joined column.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub username: String,
    pub hire_date: NaiveDate,
    pub department: String,
    pub roles: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = strum::ParseError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            username: row.username,
            hire_date: row.hire_date,
            department: row.department,
            roles: row.roles.parse()?,
        })
    }
}
