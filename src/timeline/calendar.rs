//! Calendar arithmetic shared by the grid generator and the coordinate mapper.
//!
//! All spans are inclusive of both ends and expressed in whole days.

use chrono::{Datelike, Duration, Months, NaiveDate};

use super::Granularity;

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the quarter containing `date` (quarters open in Jan, Apr, Jul, Oct).
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month0 = date.month0() / 3 * 3;
    NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or_else(|| month_start(date))
}

/// Zero-based quarter index (0..=3) of `date`.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3
}

/// Add calendar months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Subtract calendar months, clamping the day to the target month's length.
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

pub fn days_in_month(year: i32, month: u32) -> i64 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 30;
    };
    (add_months(first, 1) - first).num_days()
}

/// Sum of the three real month lengths of quarter `quarter` (0..=3) in `year`.
pub fn days_in_quarter(year: i32, quarter: u32) -> i64 {
    (1..=3).map(|m| days_in_month(year, quarter * 3 + m)).sum()
}

/// The date one column after `start` under `granularity`. Saturates at
/// `NaiveDate::MAX`.
pub fn next_column(start: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Weeks => start
            .checked_add_signed(Duration::days(7))
            .unwrap_or(NaiveDate::MAX),
        Granularity::Months => add_months(start, 1),
        Granularity::Quarters => add_months(start, 3),
    }
}

/// First and last day (inclusive) covered by the column starting at `start`.
pub fn column_span(start: NaiveDate, granularity: Granularity) -> (NaiveDate, NaiveDate) {
    match granularity {
        Granularity::Weeks => (
            start,
            start
                .checked_add_signed(Duration::days(6))
                .unwrap_or(NaiveDate::MAX),
        ),
        Granularity::Months => {
            let first = month_start(start);
            (first, add_months(first, 1) - Duration::days(1))
        }
        Granularity::Quarters => {
            let first = quarter_start(start);
            (first, add_months(first, 3) - Duration::days(1))
        }
    }
}

/// Number of days represented by the column starting at `start`.
pub fn column_days(start: NaiveDate, granularity: Granularity) -> i64 {
    match granularity {
        Granularity::Weeks => 7,
        Granularity::Months => days_in_month(start.year(), start.month()),
        Granularity::Quarters => days_in_quarter(start.year(), quarter_of(start)),
    }
}

/// Whether `date` falls inside the column starting at `start`.
pub fn column_contains(start: NaiveDate, granularity: Granularity, date: NaiveDate) -> bool {
    let (first, last) = column_span(start, granularity);
    first <= date && date <= last
}
