use chrono::NaiveDate;

use crate::model::LeaveRequest;

/// Inclusive ranges `[a_start, a_end]` and `[b_start, b_end]` share a day.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    !(a_end < b_start || a_start > b_end)
}

/// First active request that shares a calendar day with `start..=end`.
/// Half-day kinds on the same date conflict too.
pub fn find_conflict<'a>(
    requests: impl IntoIterator<Item = &'a LeaveRequest>,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<&'a LeaveRequest> {
    requests.into_iter().find(|request| {
        request.status.is_active()
            && ranges_overlap(request.start_date, request.end_date, start, end)
    })
}

pub fn has_overlap<'a>(
    requests: impl IntoIterator<Item = &'a LeaveRequest>,
    start: NaiveDate,
    end: NaiveDate,
) -> bool {
    find_conflict(requests, start, end).is_some()
}
