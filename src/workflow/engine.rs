use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::model::{Employee, LeaveKind, LeaveRequest, LeaveStatus, NewLeaveRequest, Role};

use super::balance::{requested_days, BalanceCalculator, LeaveBalance};
use super::clock::{Clock, SystemClock};
use super::error::{Denial, RuleViolation, WorkflowError};
use super::notify::NotificationIntent;
use super::overlap;
use super::policy::{ApprovalAction, ApprovalPolicy, Decision};
use super::store::{EmployeeDirectory, RequestStore, RequestTx, StoreError};

/// Raw submission as it arrives from a caller; the engine parses it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LeaveApplication {
    #[schema(example = "annual")]
    pub kind: String,
    #[schema(example = "2026-01-01", format = "date")]
    pub start_date: String,
    #[schema(example = "2026-01-02", format = "date")]
    pub end_date: String,
    #[schema(example = "family event")]
    pub reason: String,
    #[schema(example = "asmith")]
    pub backup: String,
}

/// Result of a committed mutation plus what should be announced about it.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub request: LeaveRequest,
    pub notifications: Vec<NotificationIntent>,
}

pub struct WorkflowEngine<D, S, C = SystemClock> {
    directory: D,
    store: S,
    clock: C,
    calculator: BalanceCalculator,
    policy: ApprovalPolicy,
}

impl<D, S, C> WorkflowEngine<D, S, C>
where
    D: EmployeeDirectory,
    S: RequestStore,
    C: Clock,
{
    pub fn new(directory: D, store: S, clock: C) -> Self {
        Self {
            directory,
            store,
            clock,
            calculator: BalanceCalculator::default(),
            policy: ApprovalPolicy,
        }
    }

    pub fn with_calculator(mut self, calculator: BalanceCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Validate, run the admission check, and persist a new request.
    pub async fn submit(
        &self,
        applicant: &str,
        application: LeaveApplication,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let today = self.clock.today();

        let start = parse_date("start_date", &application.start_date)?;
        if start < today {
            return Err(RuleViolation::PastStartDate { start, today }.into());
        }
        let end = parse_date("end_date", &application.end_date)?;
        let kind: LeaveKind = application.kind.trim().parse().map_err(|_| {
            WorkflowError::Validation(format!("unknown leave kind '{}'", application.kind))
        })?;
        let reason = required("reason", &application.reason)?;
        let backup = required("backup", &application.backup)?;
        if end < start {
            return Err(WorkflowError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }

        let employee = self.load_employee(applicant).await?;
        if kind.draws_from_annual_pool()
            && !self
                .calculator
                .eligible_for_annual_leave(employee.hire_date, today)
        {
            debug!(applicant, hire_date = %employee.hire_date, "tenure below eligibility");
            return Err(RuleViolation::TenureTooShort {
                hire_date: employee.hire_date,
            }
            .into());
        }

        let mut tx = self.store.begin().await?;
        tx.lock_applicant(&employee.username).await?;
        let active = tx.find_active_by_applicant(&employee.username).await?;

        if let Some(conflict) = overlap::find_conflict(&active, start, end) {
            debug!(applicant, conflicting_id = conflict.id, "overlapping leave request");
            return Err(RuleViolation::Overlap {
                start: conflict.start_date,
                end: conflict.end_date,
            }
            .into());
        }

        if kind.draws_from_annual_pool() {
            let total = self.calculator.total_entitlement(employee.hire_date, today);
            let used = self.calculator.used_days(&active);
            self.calculator
                .admit(total, used, requested_days(kind, start, end))?;
        }

        let status = self.policy.initial_status(&employee.roles);
        let request = tx
            .create(NewLeaveRequest {
                applicant: employee.username.clone(),
                kind,
                start_date: start,
                end_date: end,
                reason,
                backup,
                status,
            })
            .await?;
        tx.commit().await?;

        info!(
            request_id = request.id,
            applicant = %request.applicant,
            kind = %request.kind,
            status = %request.status,
            "leave request submitted"
        );

        let notifications = self.submission_notifications(&employee, &request).await;
        Ok(WorkflowOutcome {
            request,
            notifications,
        })
    }

    /// Withdraw a still-pending request. The record is deleted.
    pub async fn cancel(&self, request_id: u64, requester: &str) -> Result<(), WorkflowError> {
        let mut tx = self.store.begin().await?;
        let request = tx
            .find_by_id_for_update(request_id)
            .await?
            .ok_or_else(|| WorkflowError::request_not_found(request_id))?;

        if let Err(denial) = self.policy.check_cancel(requester, &request) {
            debug!(request_id, requester, %denial, "cancellation denied");
            return Err(denial.into());
        }

        if !tx.delete(request_id).await? {
            return Err(StoreError::Conflict(format!("leave request {request_id} vanished")).into());
        }
        tx.commit().await?;

        info!(request_id, requester, "leave request cancelled");
        Ok(())
    }

    pub async fn approve(
        &self,
        request_id: u64,
        approver: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        self.transition(ApprovalAction::Approve, request_id, approver)
            .await
    }

    pub async fn reject(
        &self,
        request_id: u64,
        approver: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        self.transition(ApprovalAction::Reject, request_id, approver)
            .await
    }

    /// Requests waiting on `approver`: same-department part-leader queue
    /// and/or the system-wide team-leader queue.
    pub async fn pending_approvals(
        &self,
        approver: &str,
    ) -> Result<Vec<LeaveRequest>, WorkflowError> {
        let approver = self.load_employee(approver).await?;
        let mut pending = Vec::new();

        if approver.roles.is_part_leader() {
            let mut departments: HashMap<String, Option<String>> = HashMap::new();
            for request in self
                .store
                .find_by_status(LeaveStatus::PendingPartLeader)
                .await?
            {
                if !departments.contains_key(&request.applicant) {
                    let department = self
                        .directory
                        .find_by_username(&request.applicant)
                        .await?
                        .map(|applicant| applicant.department);
                    departments.insert(request.applicant.clone(), department);
                }
                if departments
                    .get(&request.applicant)
                    .and_then(Option::as_deref)
                    == Some(approver.department.as_str())
                {
                    pending.push(request);
                }
            }
        }

        if approver.roles.is_team_leader() {
            pending.extend(
                self.store
                    .find_by_status(LeaveStatus::PendingTeamLeader)
                    .await?,
            );
        }

        Ok(pending)
    }

    pub async fn history(&self, username: &str) -> Result<Vec<LeaveRequest>, WorkflowError> {
        let employee = self.load_employee(username).await?;
        Ok(self.store.find_by_applicant(&employee.username).await?)
    }

    pub async fn balance(&self, username: &str) -> Result<LeaveBalance, WorkflowError> {
        let employee = self.load_employee(username).await?;
        let requests = self.store.find_by_applicant(&employee.username).await?;
        let total = self
            .calculator
            .total_entitlement(employee.hire_date, self.clock.today());
        let used = self.calculator.used_days(&requests);
        Ok(LeaveBalance {
            total,
            used,
            remaining: total - used,
        })
    }

    /// Directory entry of `username`, or `NotFound`.
    pub async fn employee(&self, username: &str) -> Result<Employee, WorkflowError> {
        self.load_employee(username).await
    }

    async fn transition(
        &self,
        action: ApprovalAction,
        request_id: u64,
        approver: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let actor = self.load_employee(approver).await?;

        let mut tx = self.store.begin().await?;
        let mut request = tx
            .find_by_id_for_update(request_id)
            .await?
            .ok_or_else(|| WorkflowError::request_not_found(request_id))?;

        let next = match self.policy.decide(&actor.roles, action, request.status) {
            Decision::Allow(next) => next,
            Decision::Deny(denial) => {
                debug!(request_id, approver, ?action, status = %request.status, %denial, "transition denied");
                return Err(denial.into());
            }
        };

        if !tx.update_status(request_id, request.status, next).await? {
            debug!(request_id, approver, "status changed underneath the transition");
            return Err(Denial::AlreadyProcessed.into());
        }
        tx.commit().await?;

        let previous = request.status;
        request.status = next;
        info!(
            request_id,
            approver,
            from = %previous,
            to = %next,
            "leave request transitioned"
        );

        let notifications = self.transition_notifications(&request).await;
        Ok(WorkflowOutcome {
            request,
            notifications,
        })
    }

    async fn load_employee(&self, username: &str) -> Result<Employee, WorkflowError> {
        self.directory
            .find_by_username(username)
            .await?
            .ok_or_else(|| WorkflowError::employee_not_found(username))
    }

    async fn submission_notifications(
        &self,
        applicant: &Employee,
        request: &LeaveRequest,
    ) -> Vec<NotificationIntent> {
        let message = format!(
            "{} submitted a leave request ({}..{}).",
            applicant.username, request.start_date, request.end_date
        );
        let recipients = match request.status {
            LeaveStatus::PendingTeamLeader => self.directory.find_all_by_role(Role::TeamLeader).await,
            _ => self
                .directory
                .find_by_department_and_role(&applicant.department, Role::PartLeader)
                .await
                .map(|found| found.into_iter().collect()),
        };
        address(recipients, &message, request.id)
    }

    async fn transition_notifications(&self, request: &LeaveRequest) -> Vec<NotificationIntent> {
        let (recipients, message) = match request.status {
            LeaveStatus::PendingTeamLeader => (
                self.directory.find_all_by_role(Role::TeamLeader).await,
                format!(
                    "{}'s leave request passed part-leader approval.",
                    request.applicant
                ),
            ),
            LeaveStatus::Approved => (
                self.applicant_of(request).await,
                format!(
                    "Your leave request ({}) has been approved.",
                    request.start_date
                ),
            ),
            LeaveStatus::Rejected => (
                self.applicant_of(request).await,
                format!(
                    "Your leave request ({}) has been rejected.",
                    request.start_date
                ),
            ),
            LeaveStatus::PendingPartLeader => return Vec::new(),
        };
        address(recipients, &message, request.id)
    }

    async fn applicant_of(&self, request: &LeaveRequest) -> Result<Vec<Employee>, StoreError> {
        self.directory
            .find_by_username(&request.applicant)
            .await
            .map(|found| found.into_iter().collect())
    }
}

// Recipient lookups happen after commit; a failed lookup costs the
// notification, never the transition.
fn address(
    recipients: Result<Vec<Employee>, StoreError>,
    message: &str,
    request_id: u64,
) -> Vec<NotificationIntent> {
    match recipients {
        Ok(recipients) => recipients
            .into_iter()
            .map(|employee| NotificationIntent {
                recipient_id: employee.id,
                recipient: employee.username,
                message: message.to_string(),
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, request_id, "could not resolve notification recipients");
            Vec::new()
        }
    }
}

/// Strict `YYYY-MM-DD`; chrono alone would also take `2024-7-1`.
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, WorkflowError> {
    let invalid =
        || WorkflowError::Validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'"));
    let trimmed = value.trim();
    let zero_padded = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !zero_padded {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

fn required(field: &str, value: &str) -> Result<String, WorkflowError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkflowError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
