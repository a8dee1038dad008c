//! Annual-leave entitlement and consumption.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};

use crate::model::{LeaveKind, LeaveRequest};

use super::error::RuleViolation;

/// Months of service before annual leave may be requested at all.
pub const ELIGIBILITY_MONTHS: u32 = 3;

/// Day count with half-day granularity, held as a number of half days.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeaveDays(i64);

impl LeaveDays {
    pub const ZERO: LeaveDays = LeaveDays(0);
    pub const HALF: LeaveDays = LeaveDays(1);

    pub fn days(days: i64) -> Self {
        Self(days * 2)
    }

    pub fn from_half_days(half_days: i64) -> Self {
        Self(half_days)
    }

    pub fn half_days(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl Add for LeaveDays {
    type Output = LeaveDays;

    fn add(self, rhs: Self) -> Self::Output {
        LeaveDays(self.0 + rhs.0)
    }
}

impl Sub for LeaveDays {
    type Output = LeaveDays;

    fn sub(self, rhs: Self) -> Self::Output {
        LeaveDays(self.0 - rhs.0)
    }
}

impl std::iter::Sum for LeaveDays {
    fn sum<I: Iterator<Item = LeaveDays>>(iter: I) -> Self {
        iter.fold(LeaveDays::ZERO, Add::add)
    }
}

impl fmt::Display for LeaveDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        if abs % 2 == 0 {
            write!(f, "{sign}{}", abs / 2)
        } else {
            write!(f, "{sign}{}.5", abs / 2)
        }
    }
}

impl Serialize for LeaveDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Completed calendar months between `from` and `to`.
///
/// Adding months clamps to the end of shorter months, so 2024-01-31 reaches
/// one full month on 2024-02-29.
pub fn full_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to < from {
        return 0;
    }
    let mut months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    while months > 0 {
        match from.checked_add_months(Months::new(months as u32)) {
            Some(reached) if reached <= to => break,
            _ => months -= 1,
        }
    }
    months.max(0) as u32
}

/// Maps tenure to an annual entitlement. Implementations must never shrink the
/// entitlement as `as_of` moves later.
pub trait EntitlementRule {
    fn entitlement(&self, hire_date: NaiveDate, as_of: NaiveDate) -> LeaveDays;
}

/// Monthly accrual during the first year, then 15 days growing by one day per
/// two further years of service, up to 25.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatutoryEntitlement;

impl StatutoryEntitlement {
    const FIRST_YEAR_CAP: u32 = 11;
    const BASE_DAYS: u32 = 15;
    const MAX_DAYS: u32 = 25;
}

impl EntitlementRule for StatutoryEntitlement {
    fn entitlement(&self, hire_date: NaiveDate, as_of: NaiveDate) -> LeaveDays {
        let months = full_months_between(hire_date, as_of);
        let years = months / 12;
        let days = if years == 0 {
            months.min(Self::FIRST_YEAR_CAP)
        } else {
            (Self::BASE_DAYS + (years - 1) / 2).min(Self::MAX_DAYS)
        };
        LeaveDays::days(days as i64)
    }
}

/// Same allowance for everyone, regardless of tenure.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntitlement(pub LeaveDays);

impl EntitlementRule for FixedEntitlement {
    fn entitlement(&self, _hire_date: NaiveDate, _as_of: NaiveDate) -> LeaveDays {
        self.0
    }
}

/// Days a single request draws from the annual pool.
pub fn requested_days(kind: LeaveKind, start: NaiveDate, end: NaiveDate) -> LeaveDays {
    match kind {
        LeaveKind::Annual => LeaveDays::days((end - start).num_days() + 1),
        kind if kind.is_half_day() => LeaveDays::HALF,
        _ => LeaveDays::ZERO,
    }
}

pub struct BalanceCalculator {
    rule: Box<dyn EntitlementRule + Send + Sync>,
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(StatutoryEntitlement)
    }
}

impl BalanceCalculator {
    pub fn new(rule: impl EntitlementRule + Send + Sync + 'static) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    pub fn eligible_for_annual_leave(&self, hire_date: NaiveDate, as_of: NaiveDate) -> bool {
        full_months_between(hire_date, as_of) >= ELIGIBILITY_MONTHS
    }

    pub fn total_entitlement(&self, hire_date: NaiveDate, as_of: NaiveDate) -> LeaveDays {
        self.rule.entitlement(hire_date, as_of)
    }

    /// Sum over active requests only; rejected ones never count.
    pub fn used_days<'a>(&self, requests: impl IntoIterator<Item = &'a LeaveRequest>) -> LeaveDays {
        requests
            .into_iter()
            .filter(|request| request.status.is_active())
            .map(|request| requested_days(request.kind, request.start_date, request.end_date))
            .sum()
    }

    /// `used + requested <= total`, otherwise reports what is left.
    pub fn admit(
        &self,
        total: LeaveDays,
        used: LeaveDays,
        requested: LeaveDays,
    ) -> Result<(), RuleViolation> {
        if used + requested > total {
            return Err(RuleViolation::BalanceExceeded {
                remaining: total - used,
            });
        }
        Ok(())
    }
}

/// Snapshot of an applicant's annual-leave position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub total: LeaveDays,
    pub used: LeaveDays,
    pub remaining: LeaveDays,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LeaveStatus;
    use chrono::Utc;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn request(kind: LeaveKind, start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            applicant: "jdoe".to_string(),
            kind,
            start_date: start,
            end_date: end,
            reason: "rest".to_string(),
            backup: "asmith".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn eligibility_needs_three_full_months() {
        let calc = BalanceCalculator::default();
        let hired = date(2024, 1, 1);
        assert!(!calc.eligible_for_annual_leave(hired, date(2024, 2, 1)));
        assert!(!calc.eligible_for_annual_leave(hired, date(2024, 3, 31)));
        assert!(calc.eligible_for_annual_leave(hired, date(2024, 4, 1)));
        assert!(calc.eligible_for_annual_leave(hired, date(2024, 4, 2)));
    }

    #[test]
    fn full_months_clamp_at_month_end() {
        assert_eq!(full_months_between(date(2024, 1, 31), date(2024, 2, 28)), 0);
        assert_eq!(full_months_between(date(2024, 1, 31), date(2024, 2, 29)), 1);
        assert_eq!(full_months_between(date(2024, 3, 15), date(2024, 3, 1)), 0);
        assert_eq!(full_months_between(date(2020, 6, 1), date(2024, 6, 1)), 48);
    }

    #[test]
    fn statutory_table() {
        let rule = StatutoryEntitlement;
        let hired = date(2020, 1, 1);
        assert_eq!(rule.entitlement(hired, date(2019, 12, 1)), LeaveDays::ZERO);
        assert_eq!(rule.entitlement(hired, date(2020, 4, 1)), LeaveDays::days(3));
        assert_eq!(rule.entitlement(hired, date(2020, 12, 31)), LeaveDays::days(11));
        assert_eq!(rule.entitlement(hired, date(2021, 1, 1)), LeaveDays::days(15));
        assert_eq!(rule.entitlement(hired, date(2023, 1, 1)), LeaveDays::days(16));
        assert_eq!(rule.entitlement(hired, date(2060, 1, 1)), LeaveDays::days(25));
    }

    #[test]
    fn used_days_counts_annual_span_and_half_days() {
        let calc = BalanceCalculator::default();
        let requests = vec![
            request(LeaveKind::Annual, date(2024, 5, 1), date(2024, 5, 3), LeaveStatus::Approved),
            request(LeaveKind::AmHalfDay, date(2024, 6, 1), date(2024, 6, 1), LeaveStatus::PendingPartLeader),
            request(LeaveKind::PmHalfDay, date(2024, 6, 2), date(2024, 6, 2), LeaveStatus::PendingTeamLeader),
            request(LeaveKind::Sick, date(2024, 7, 1), date(2024, 7, 5), LeaveStatus::Approved),
            request(LeaveKind::Annual, date(2024, 8, 1), date(2024, 8, 10), LeaveStatus::Rejected),
        ];
        assert_eq!(calc.used_days(&requests), LeaveDays::days(4));
    }

    #[test]
    fn admission_reports_remaining_half_day() {
        let calc = BalanceCalculator::new(FixedEntitlement(LeaveDays::days(15)));
        let used = LeaveDays::from_half_days(29);
        let err = calc
            .admit(LeaveDays::days(15), used, LeaveDays::days(1))
            .expect_err("one more day exceeds the balance");
        assert_eq!(err.to_string(), "annual leave balance exceeded: 0.5 day(s) remaining");
        assert!(calc.admit(LeaveDays::days(15), used, LeaveDays::HALF).is_ok());
    }

    #[test]
    fn leave_days_display() {
        assert_eq!(LeaveDays::days(15).to_string(), "15");
        assert_eq!(LeaveDays::from_half_days(29).to_string(), "14.5");
        assert_eq!(LeaveDays::HALF.to_string(), "0.5");
        assert_eq!(LeaveDays::from_half_days(-1).to_string(), "-0.5");
        assert_eq!(LeaveDays::days(-1).to_string(), "-1");
    }

    proptest! {
        #[test]
        fn entitlement_never_decreases_with_tenure(hired in 0i64..20_000, a in 0i64..15_000, b in 0i64..15_000) {
            let rule = StatutoryEntitlement;
            let base = date(1990, 1, 1);
            let hire_date = base + chrono::Duration::days(hired);
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            let first = rule.entitlement(hire_date, hire_date + chrono::Duration::days(earlier));
            let second = rule.entitlement(hire_date, hire_date + chrono::Duration::days(later));
            prop_assert!(first <= second);
        }

        #[test]
        fn used_days_ignores_rejected_requests(spans in proptest::collection::vec((0i64..400, 0i64..10, any::<bool>()), 0..20)) {
            let calc = BalanceCalculator::default();
            let base = date(2025, 1, 1);
            let requests: Vec<_> = spans
                .iter()
                .map(|(offset, len, rejected)| {
                    let start = base + chrono::Duration::days(*offset);
                    let status = if *rejected { LeaveStatus::Rejected } else { LeaveStatus::Approved };
                    request(LeaveKind::Annual, start, start + chrono::Duration::days(*len), status)
                })
                .collect();
            let expected: i64 = spans
                .iter()
                .filter(|(_, _, rejected)| !rejected)
                .map(|(_, len, _)| len + 1)
                .sum();
            prop_assert_eq!(calc.used_days(&requests), LeaveDays::days(expected));
        }
    }
}
