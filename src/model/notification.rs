use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One inbox row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Notification {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = "jdoe submitted a leave request (2026-01-01..2026-01-02).")]
    pub message: String,
    pub is_read: bool,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
