use sqlx::{MySql, MySqlPool, Transaction};

use crate::model::{LeaveRequest, LeaveRequestRow, LeaveStatus, NewLeaveRequest};
use crate::workflow::{RequestStore, RequestTx, StoreError};

use super::classify;

const COLUMNS: &str =
    "id, applicant, leave_type, start_date, end_date, reason, backup, status, created_at";

#[derive(Clone)]
pub struct SqlLeaveStore {
    pool: MySqlPool,
}

impl SqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_request(row: LeaveRequestRow) -> Result<LeaveRequest, StoreError> {
    let id = row.id;
    LeaveRequest::try_from(row).map_err(|e| {
        tracing::error!(error = %e, id, "Unreadable leave request row");
        StoreError::from(e)
    })
}

fn into_requests(rows: Vec<LeaveRequestRow>) -> Result<Vec<LeaveRequest>, StoreError> {
    rows.into_iter().map(into_request).collect()
}

impl RequestStore for SqlLeaveStore {
    type Tx = SqlLeaveTx;

    async fn begin(&self) -> Result<SqlLeaveTx, StoreError> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open transaction");
            StoreError::from(e)
        })?;
        Ok(SqlLeaveTx { tx })
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ?");
        sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_request)
            .transpose()
    }

    async fn find_by_applicant(&self, username: &str) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM leave_requests
             WHERE applicant = ?
             ORDER BY start_date DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        into_requests(rows)
    }

    async fn find_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE status = ? ORDER BY id");
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(status.as_ref())
            .fetch_all(&self.pool)
            .await?;
        into_requests(rows)
    }
}

/// Rolls back on drop unless committed.
pub struct SqlLeaveTx {
    tx: Transaction<'static, MySql>,
}

impl RequestTx for SqlLeaveTx {
    async fn lock_applicant(&mut self, username: &str) -> Result<(), StoreError> {
        // the employee row is the per-applicant mutex
        sqlx::query_scalar::<_, u64>("SELECT id FROM employees WHERE username = ? FOR UPDATE")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn find_active_by_applicant(
        &mut self,
        username: &str,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let [a, b, c] = LeaveStatus::ACTIVE;
        let sql = format!(
            "SELECT {COLUMNS} FROM leave_requests
             WHERE applicant = ? AND status IN (?, ?, ?)
             ORDER BY start_date"
        );
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(username)
            .bind(a.as_ref())
            .bind(b.as_ref())
            .bind(c.as_ref())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(classify)?;
        into_requests(rows)
    }

    async fn find_by_id_for_update(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ? FOR UPDATE");
        sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(classify)?
            .map(into_request)
            .transpose()
    }

    async fn create(&mut self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            "INSERT INTO leave_requests
             (applicant, leave_type, start_date, end_date, reason, backup, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.applicant)
        .bind(request.kind.as_ref())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(&request.backup)
        .bind(request.status.as_ref())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, applicant = %request.applicant, "Failed to insert leave request");
            classify(e)
        })?;

        let id = result.last_insert_id();
        self.find_by_id_for_update(id)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("leave request {id} missing after insert")))
    }

    async fn update_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ? AND status = ?")
            .bind(to.as_ref())
            .bind(id)
            .bind(from.as_ref())
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() == 1)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Commit failed");
            classify(e)
        })
    }
}
