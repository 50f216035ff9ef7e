//! Leave day counting and calendar helpers.
//!
//! Leave requests are charged in working days: weekends are skipped unless
//! the caller includes them, and holidays are always skipped. Payroll, on the
//! other hand, counts calendar days of overlap with the payroll month.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of counting the chargeable days of a leave range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDayCount {
    /// Chargeable days.
    pub days: Decimal,
    /// Weekend days skipped.
    pub weekend_days: u32,
    /// Holidays skipped (weekend holidays are counted as weekend days).
    pub holiday_days: u32,
}

/// Returns true for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the chargeable leave days in `[start, end]`.
///
/// A day is skipped if it falls on a weekend (unless `include_weekends`)
/// or appears in `holidays`. Returns zero days when `start > end`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use hr_engine::calculation::count_leave_days;
///
/// // Monday 2026-01-19 to Sunday 2026-01-25
/// let start = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
///
/// let count = count_leave_days(start, end, false, &BTreeSet::new());
/// assert_eq!(count.days, Decimal::from(5));
/// assert_eq!(count.weekend_days, 2);
/// ```
pub fn count_leave_days(
    start: NaiveDate,
    end: NaiveDate,
    include_weekends: bool,
    holidays: &BTreeSet<NaiveDate>,
) -> LeaveDayCount {
    let mut days: u32 = 0;
    let mut weekend_days: u32 = 0;
    let mut holiday_days: u32 = 0;

    for day in start.iter_days().take_while(|d| *d <= end) {
        if !include_weekends && is_weekend(day) {
            weekend_days += 1;
        } else if holidays.contains(&day) {
            holiday_days += 1;
        } else {
            days += 1;
        }
    }

    LeaveDayCount {
        days: Decimal::from(days),
        weekend_days,
        holiday_days,
    }
}

/// Returns the first and last day of a month, or `None` for an invalid month.
///
/// ```
/// use chrono::NaiveDate;
/// use hr_engine::calculation::month_bounds;
///
/// let (first, last) = month_bounds(2024, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(month_bounds(2024, 13).is_none());
/// ```
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(chrono::Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Number of calendar days in a month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    month_bounds(year, month).map(|(_, last)| last.day())
}

/// Inclusive calendar-day overlap between `[start, end]` and
/// `[period_start, period_end]`; zero when the ranges are disjoint.
///
/// ```
/// use chrono::NaiveDate;
/// use hr_engine::calculation::overlap_days;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// // Leave 28 Jan - 3 Feb overlaps February by three days.
/// assert_eq!(overlap_days(d(1, 28), d(2, 3), d(2, 1), d(2, 28)), 3);
/// assert_eq!(overlap_days(d(3, 1), d(3, 2), d(2, 1), d(2, 28)), 0);
/// ```
pub fn overlap_days(
    start: NaiveDate,
    end: NaiveDate,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> u32 {
    let from = start.max(period_start);
    let to = end.min(period_end);
    if from > to {
        return 0;
    }
    ((to - from).num_days() + 1) as u32
}

/// Years touched by `[start, end]`, used to load holiday calendars.
pub fn years_spanned(start: NaiveDate, end: NaiveDate) -> Vec<i32> {
    if start > end {
        return vec![start.year()];
    }
    (start.year()..=end.year()).collect()
}
