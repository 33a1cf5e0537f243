//! Late-payment interest on fines.
//!
//! Display-only estimate; the backend keeps the authoritative amount.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::round2;

/// Whole days between the due date and today, never negative.
pub fn days_overdue(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days().max(0)
}

/// Accepts `YYYY-MM-DD` and full ISO timestamps (only the date part is read).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Начисленная пеня по штрафу
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyAccrual {
    pub days_overdue: i64,
    pub penalty: f64,
    pub total_due: f64,
}

impl PenaltyAccrual {
    pub fn compute(
        principal: f64,
        daily_interest_percent: f64,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let days = days_overdue(due_date, today);
        let penalty = round2(principal * (daily_interest_percent / 100.0) * days as f64);
        Self {
            days_overdue: days,
            penalty,
            total_due: round2(principal + penalty),
        }
    }

    /// No due date means nothing accrues.
    pub fn compute_opt(
        principal: f64,
        daily_interest_percent: f64,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        match due_date {
            Some(due) => Self::compute(principal, daily_interest_percent, due, today),
            None => Self {
                days_overdue: 0,
                penalty: 0.0,
                total_due: round2(principal),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fine_example() {
        let today = date(2024, 6, 20);
        let due = date(2024, 6, 10);
        let accrual = PenaltyAccrual::compute(200.0, 1.0, due, today);
        assert_eq!(accrual.days_overdue, 10);
        assert_eq!(accrual.penalty, 20.0);
        assert_eq!(accrual.total_due, 220.0);
    }

    #[test]
    fn test_not_yet_due() {
        let accrual = PenaltyAccrual::compute(200.0, 1.0, date(2024, 7, 1), date(2024, 6, 20));
        assert_eq!(accrual.days_overdue, 0);
        assert_eq!(accrual.penalty, 0.0);
        assert_eq!(accrual.total_due, 200.0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T14:02:26Z"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("15.03.2024"), None);
    }

    #[test]
    fn test_missing_due_date() {
        let accrual = PenaltyAccrual::compute_opt(150.0, 2.0, None, date(2024, 6, 20));
        assert_eq!(accrual.penalty, 0.0);
        assert_eq!(accrual.total_due, 150.0);
    }

    proptest! {
        #[test]
        fn prop_days_overdue(offset in -3650i64..3650) {
            let today = date(2024, 1, 1);
            let due = today - chrono::Duration::days(offset);
            let days = days_overdue(due, today);
            if offset >= 0 {
                prop_assert_eq!(days, offset);
            } else {
                prop_assert_eq!(days, 0);
            }
        }

        #[test]
        fn prop_penalty_formula(principal_cents in 0u32..10_000_000, pct in 0u32..50, offset in 0i64..1000) {
            let today = date(2024, 1, 1);
            let due = today - chrono::Duration::days(offset);
            let principal = f64::from(principal_cents) / 100.0;
            let rate = f64::from(pct);
            let accrual = PenaltyAccrual::compute(principal, rate, due, today);
            prop_assert_eq!(accrual.penalty, round2(principal * (rate / 100.0) * offset as f64));
            if offset == 0 || pct == 0 {
                prop_assert_eq!(accrual.penalty, 0.0);
            }
        }
    }
}
