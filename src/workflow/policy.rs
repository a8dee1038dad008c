//! Who may move a request, and where to.

use crate::model::{LeaveRequest, LeaveStatus, RoleSet};

use super::error::Denial;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(LeaveStatus),
    Deny(Denial),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalPolicy;

impl ApprovalPolicy {
    /// A part-leader's own request skips the part-leader tier.
    pub fn initial_status(&self, applicant_roles: &RoleSet) -> LeaveStatus {
        if applicant_roles.is_part_leader() {
            LeaveStatus::PendingTeamLeader
        } else {
            LeaveStatus::PendingPartLeader
        }
    }

    pub fn decide(&self, actor: &RoleSet, action: ApprovalAction, current: LeaveStatus) -> Decision {
        match action {
            ApprovalAction::Approve => Self::decide_approve(actor, current),
            ApprovalAction::Reject => Self::decide_reject(actor, current),
        }
    }

    fn decide_approve(actor: &RoleSet, current: LeaveStatus) -> Decision {
        match current {
            LeaveStatus::Approved | LeaveStatus::Rejected => Decision::Deny(Denial::AlreadyProcessed),
            LeaveStatus::PendingTeamLeader if actor.is_team_leader() => {
                Decision::Allow(LeaveStatus::Approved)
            }
            LeaveStatus::PendingPartLeader if actor.is_part_leader() => {
                Decision::Allow(LeaveStatus::PendingTeamLeader)
            }
            _ => Decision::Deny(Denial::NoPermission),
        }
    }

    fn decide_reject(actor: &RoleSet, current: LeaveStatus) -> Decision {
        if !actor.can_approve() {
            return Decision::Deny(Denial::NoPermission);
        }
        if current.is_terminal() {
            return Decision::Deny(Denial::AlreadyProcessed);
        }
        Decision::Allow(LeaveStatus::Rejected)
    }

    /// Cancellation deletes the request; only the applicant may do it, and
    /// only while it is still pending.
    pub fn check_cancel(&self, requester: &str, request: &LeaveRequest) -> Result<(), Denial> {
        if request.applicant != requester {
            return Err(Denial::NotApplicant);
        }
        if request.status.is_terminal() {
            return Err(Denial::AlreadyProcessed);
        }
        Ok(())
    }
}
