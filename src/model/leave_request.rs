use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, EnumString,
    Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveKind {
    Annual,
    AmHalfDay,
    PmHalfDay,
    Sick,
    Unpaid,
    Special,
}

impl LeaveKind {
    pub fn is_half_day(self) -> bool {
        matches!(self, LeaveKind::AmHalfDay | LeaveKind::PmHalfDay)
    }

    /// Kinds that consume annual-leave entitlement.
    pub fn draws_from_annual_pool(self) -> bool {
        self == LeaveKind::Annual || self.is_half_day()
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, EnumString,
    Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    PendingPartLeader,
    PendingTeamLeader,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const ACTIVE: [LeaveStatus; 3] = [
        LeaveStatus::PendingPartLeader,
        LeaveStatus::PendingTeamLeader,
        LeaveStatus::Approved,
    ];

    pub fn is_pending(self) -> bool {
        matches!(
            self,
            LeaveStatus::PendingPartLeader | LeaveStatus::PendingTeamLeader
        )
    }

    /// Counts against the applicant's balance and blocks overlapping dates.
    pub fn is_active(self) -> bool {
        self.is_pending() || self == LeaveStatus::Approved
    }

    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "jdoe")]
    pub applicant: String,
    pub kind: LeaveKind,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-02", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "family event")]
    pub reason: String,
    /// who covers for the applicant while away
    #[schema(example = "asmith")]
    pub backup: String,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// A validated request about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub applicant: String,
    pub kind: LeaveKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub backup: String,
    pub status: LeaveStatus,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LeaveRequestRow {
    pub id: u64,
    pub applicant: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub backup: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = strum::ParseError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        Ok(LeaveRequest {
            id: row.id,
            applicant: row.applicant,
            kind: row.leave_type.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            backup: row.backup,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}
