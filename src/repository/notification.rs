use sqlx::MySqlPool;

use crate::model::Notification;
use crate::workflow::{Inbox, Notifier, NotifyError};

/// Writes one inbox row per message into `notifications`.
#[derive(Clone)]
pub struct SqlNotifier {
    pool: MySqlPool,
}

impl SqlNotifier {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl Notifier for SqlNotifier {
    async fn notify(&self, employee_id: u64, message: &str) -> Result<(), NotifyError> {
        sqlx::query("INSERT INTO notifications (employee_id, message) VALUES (?, ?)")
            .bind(employee_id)
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl Inbox for SqlNotifier {
    async fn list(&self, employee_id: u64) -> Result<Vec<Notification>, NotifyError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT id, employee_id, message, is_read, created_at
             FROM notifications
             WHERE employee_id = ?
             ORDER BY id DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn unread_count(&self, employee_id: u64) -> Result<u64, NotifyError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE employee_id = ? AND is_read = FALSE",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn mark_all_read(&self, employee_id: u64) -> Result<u64, NotifyError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE employee_id = ? AND is_read = FALSE",
        )
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
