use chrono::NaiveDate;

use crate::model::{Employee, LeaveKind, LeaveRequest, LeaveStatus, NewLeaveRequest, Role, RoleSet};
use crate::workflow::memory::{MemoryDirectory, MemoryRequestStore};
use crate::workflow::{
    BalanceCalculator, FixedClock, FixedEntitlement, LeaveApplication, LeaveDays, WorkflowEngine,
};

pub(crate) type TestEngine = WorkflowEngine<MemoryDirectory, MemoryRequestStore, FixedClock>;

pub(crate) const MEMBER: &str = "jdoe";
pub(crate) const PART_LEADER: &str = "pkim";
pub(crate) const OTHER_PART_LEADER: &str = "slee";
pub(crate) const TEAM_LEADER: &str = "tchoi";
pub(crate) const OTHER_TEAM_LEADER: &str = "tpark";
pub(crate) const NEW_HIRE: &str = "newbie";
pub(crate) const LONE_MEMBER: &str = "solo";
pub(crate) const DUAL_LEADER: &str = "hbae";

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn today() -> NaiveDate {
    date(2024, 6, 3)
}

fn employee(id: u64, username: &str, department: &str, hired: NaiveDate, roles: &[Role]) -> Employee {
    Employee {
        id,
        username: username.to_string(),
        hire_date: hired,
        department: department.to_string(),
        roles: RoleSet::new(roles.iter().copied()),
    }
}

pub(crate) fn directory() -> MemoryDirectory {
    MemoryDirectory::new([
        employee(1, MEMBER, "platform", date(2020, 1, 1), &[Role::Member]),
        employee(2, PART_LEADER, "platform", date(2019, 3, 1), &[Role::Member, Role::PartLeader]),
        employee(3, OTHER_PART_LEADER, "design", date(2018, 5, 1), &[Role::PartLeader]),
        employee(4, TEAM_LEADER, "platform", date(2015, 1, 1), &[Role::TeamLeader]),
        employee(5, OTHER_TEAM_LEADER, "design", date(2016, 1, 1), &[Role::TeamLeader]),
        employee(6, NEW_HIRE, "platform", date(2024, 1, 1), &[Role::Member]),
        employee(7, LONE_MEMBER, "research", date(2021, 1, 1), &[Role::Member]),
        employee(8, DUAL_LEADER, "design", date(2014, 1, 1), &[Role::PartLeader, Role::TeamLeader]),
    ])
}

pub(crate) fn engine_at(on: NaiveDate, store: &MemoryRequestStore) -> TestEngine {
    WorkflowEngine::new(directory(), store.clone(), FixedClock(on))
}

pub(crate) fn engine(store: &MemoryRequestStore) -> TestEngine {
    engine_at(today(), store)
}

/// Engine where everyone gets a flat allowance.
pub(crate) fn engine_with_allowance(store: &MemoryRequestStore, days: LeaveDays) -> TestEngine {
    engine(store).with_calculator(BalanceCalculator::new(FixedEntitlement(days)))
}

pub(crate) fn application(kind: &str, start: &str, end: &str) -> LeaveApplication {
    LeaveApplication {
        kind: kind.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        reason: "personal matters".to_string(),
        backup: "asmith".to_string(),
    }
}

pub(crate) async fn seed(
    store: &MemoryRequestStore,
    applicant: &str,
    kind: LeaveKind,
    start: NaiveDate,
    end: NaiveDate,
    status: LeaveStatus,
) -> LeaveRequest {
    store
        .seed(NewLeaveRequest {
            applicant: applicant.to_string(),
            kind,
            start_date: start,
            end_date: end,
            reason: "seeded".to_string(),
            backup: "asmith".to_string(),
            status,
        })
        .await
}

pub(crate) fn recipients(outcome: &crate::workflow::WorkflowOutcome) -> Vec<u64> {
    let mut ids: Vec<u64> = outcome
        .notifications
        .iter()
        .map(|intent| intent.recipient_id)
        .collect();
    ids.sort_unstable();
    ids
}
