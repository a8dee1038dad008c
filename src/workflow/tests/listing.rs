use super::common::*;
use crate::model::{LeaveKind, LeaveStatus};
use crate::workflow::memory::MemoryRequestStore;
use crate::workflow::{LeaveDays, WorkflowError};

async fn seeded_queue() -> MemoryRequestStore {
    let store = MemoryRequestStore::new();
    let day = date(2024, 7, 1);
    // platform member, waiting on platform part-leader
    seed(&store, MEMBER, LeaveKind::Annual, day, day, LeaveStatus::PendingPartLeader).await;
    // research member, no part-leader in that department
    seed(&store, LONE_MEMBER, LeaveKind::Annual, day, day, LeaveStatus::PendingPartLeader).await;
    // platform part-leader's own request
    seed(&store, PART_LEADER, LeaveKind::Annual, day, day, LeaveStatus::PendingTeamLeader).await;
    seed(&store, NEW_HIRE, LeaveKind::Sick, day, day, LeaveStatus::Approved).await;
    store
}

fn ids(requests: &[crate::model::LeaveRequest]) -> Vec<u64> {
    requests.iter().map(|r| r.id).collect()
}

#[actix_web::test]
async fn part_leader_sees_own_department_only() {
    let store = seeded_queue().await;
    let engine = engine(&store);

    let platform = engine.pending_approvals(PART_LEADER).await.expect("listing");
    assert_eq!(ids(&platform), vec![1]);

    let design = engine.pending_approvals(OTHER_PART_LEADER).await.expect("listing");
    assert!(design.is_empty());
}

#[actix_web::test]
async fn team_leader_sees_every_department() {
    let store = seeded_queue().await;
    let pending = engine(&store).pending_approvals(OTHER_TEAM_LEADER).await.expect("listing");
    assert_eq!(ids(&pending), vec![3]);
}

#[actix_web::test]
async fn dual_role_gets_the_union() {
    let store = seeded_queue().await;
    // design team-leader applying as a regular member of the design department
    let design = seed(&store, OTHER_TEAM_LEADER, LeaveKind::Annual, date(2024, 8, 1), date(2024, 8, 1), LeaveStatus::PendingPartLeader).await;
    let design_part_leader = seed(&store, OTHER_PART_LEADER, LeaveKind::Annual, date(2024, 8, 1), date(2024, 8, 1), LeaveStatus::PendingTeamLeader).await;

    let pending = engine(&store).pending_approvals(DUAL_LEADER).await.expect("listing");
    assert_eq!(ids(&pending), vec![design.id, 3, design_part_leader.id]);
}

#[actix_web::test]
async fn members_have_nothing_to_approve() {
    let store = seeded_queue().await;
    let pending = engine(&store).pending_approvals(MEMBER).await.expect("listing");
    assert!(pending.is_empty());
    assert!(matches!(
        engine(&store).pending_approvals("ghost").await,
        Err(WorkflowError::NotFound { .. })
    ));
}

#[actix_web::test]
async fn history_is_newest_start_first() {
    let store = MemoryRequestStore::new();
    seed(&store, MEMBER, LeaveKind::Annual, date(2024, 3, 1), date(2024, 3, 1), LeaveStatus::Approved).await;
    seed(&store, MEMBER, LeaveKind::Sick, date(2024, 9, 1), date(2024, 9, 2), LeaveStatus::Rejected).await;
    seed(&store, MEMBER, LeaveKind::PmHalfDay, date(2024, 5, 1), date(2024, 5, 1), LeaveStatus::PendingPartLeader).await;
    seed(&store, PART_LEADER, LeaveKind::Annual, date(2024, 4, 1), date(2024, 4, 1), LeaveStatus::Approved).await;

    let history = engine(&store).history(MEMBER).await.expect("history");
    let starts: Vec<_> = history.iter().map(|r| r.start_date).collect();
    assert_eq!(starts, vec![date(2024, 9, 1), date(2024, 5, 1), date(2024, 3, 1)]);
}

#[actix_web::test]
async fn balance_summarises_active_usage() {
    let store = MemoryRequestStore::new();
    seed(&store, MEMBER, LeaveKind::Annual, date(2024, 3, 4), date(2024, 3, 8), LeaveStatus::Approved).await;
    seed(&store, MEMBER, LeaveKind::AmHalfDay, date(2024, 5, 1), date(2024, 5, 1), LeaveStatus::PendingTeamLeader).await;
    seed(&store, MEMBER, LeaveKind::Annual, date(2024, 9, 2), date(2024, 9, 6), LeaveStatus::Rejected).await;

    // hired 2020-01-01, four full years by 2024-06-03
    let balance = engine(&store).balance(MEMBER).await.expect("balance");
    assert_eq!(balance.total, LeaveDays::days(16));
    assert_eq!(balance.used, LeaveDays::from_half_days(11));
    assert_eq!(balance.remaining, LeaveDays::from_half_days(21));
}
