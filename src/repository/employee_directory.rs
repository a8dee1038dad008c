use sqlx::MySqlPool;

use crate::model::{Employee, EmployeeRow, Role};
use crate::workflow::{EmployeeDirectory, StoreError};

const COLUMNS: &str = "id, username, hire_date, department, roles";

#[derive(Clone)]
pub struct SqlEmployeeDirectory {
    pool: MySqlPool,
}

impl SqlEmployeeDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_employee(row: EmployeeRow) -> Result<Employee, StoreError> {
    let username = row.username.clone();
    Employee::try_from(row).map_err(|e| {
        tracing::error!(error = %e, username, "Unreadable role list");
        StoreError::from(e)
    })
}

/// `LIKE` only narrows the scan; stored lists may carry spaces
/// (`"member, part_leader"`), so membership is decided on the parsed set.
fn holding_role(rows: Vec<EmployeeRow>, role: Role) -> Result<Vec<Employee>, StoreError> {
    let mut found = Vec::new();
    for row in rows {
        let employee = into_employee(row)?;
        if employee.roles.contains(role) {
            found.push(employee);
        }
    }
    Ok(found)
}

impl EmployeeDirectory for SqlEmployeeDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM employees WHERE username = ?");
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(into_employee)
            .transpose()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM employees WHERE id = ?");
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_employee)
            .transpose()
    }

    async fn find_by_department_and_role(
        &self,
        department: &str,
        role: Role,
    ) -> Result<Option<Employee>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM employees
             WHERE department = ? AND roles LIKE CONCAT('%', ?, '%')
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(department)
            .bind(role.as_ref())
            .fetch_all(&self.pool)
            .await?;
        Ok(holding_role(rows, role)?.into_iter().next())
    }

    async fn find_all_by_role(&self, role: Role) -> Result<Vec<Employee>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM employees WHERE roles LIKE CONCAT('%', ?, '%') ORDER BY id"
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(role.as_ref())
            .fetch_all(&self.pool)
            .await?;
        holding_role(rows, role)
    }
}
