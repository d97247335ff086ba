//! Calendar grid generation: visible range plus the time columns that cover it.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::calendar::{self, column_contains, month_start, next_column, quarter_of, quarter_start};
use super::Granularity;

/// The bounded date window the timeline renders, independent of item dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `years_back` years before `today` through `years_forward` years after it.
    pub fn around(today: NaiveDate, years_back: u32, years_forward: u32) -> Self {
        Self {
            start: calendar::sub_months(today, years_back.saturating_mul(12)),
            end: calendar::add_months(today, years_forward.saturating_mul(12)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Truncate `date` to the range boundaries.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        if self.start > self.end {
            return date;
        }
        date.clamp(self.start, self.end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Column start dates covering `[visible_start, visible_end]`.
///
/// Weeks start at `visible_start` itself, months snap to the 1st and quarters
/// snap back to the quarter boundary. Empty when the range is inverted.
pub fn generate_columns(
    visible_start: NaiveDate,
    visible_end: NaiveDate,
    granularity: Granularity,
) -> Vec<NaiveDate> {
    if visible_start > visible_end {
        return Vec::new();
    }

    let mut current = match granularity {
        Granularity::Weeks => visible_start,
        Granularity::Months => month_start(visible_start),
        Granularity::Quarters => quarter_start(visible_start),
    };

    let mut columns = Vec::new();
    while current <= visible_end {
        columns.push(current);
        let next = next_column(current, granularity);
        if next <= current {
            break;
        }
        current = next;
    }
    columns
}

/// Header entry for one column, positioned in content pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub position: f32,
    pub start: NaiveDate,
    pub label: String,
    pub sublabel: String,
    /// True when today falls inside this column.
    pub is_current: bool,
    /// One tile per day of the column. Only filled for weeks.
    pub days: Vec<DayTile>,
}

/// A single day cell drawn under a week header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTile {
    pub date: NaiveDate,
    pub day_number: u32,
    pub is_weekend: bool,
    pub is_today: bool,
}

/// Day tiles for the column starting at `start`; empty unless `granularity`
/// is weeks.
pub fn day_tiles(start: NaiveDate, granularity: Granularity, today: NaiveDate) -> Vec<DayTile> {
    if granularity != Granularity::Weeks {
        return Vec::new();
    }
    let (_, last) = calendar::column_span(start, granularity);
    start
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| DayTile {
            date,
            day_number: date.day(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_today: date == today,
        })
        .collect()
}

pub fn column_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Weeks | Granularity::Months => start.format("%b").to_string().to_uppercase(),
        Granularity::Quarters => match quarter_of(start) {
            0 => "JAN - MAR",
            1 => "APR - JUN",
            2 => "JUL - SEP",
            _ => "OCT - DEC",
        }
        .to_string(),
    }
}

pub fn column_sublabel(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Weeks => format!("W{}", start.iso_week().week()),
        Granularity::Months => start.year().to_string(),
        Granularity::Quarters => format!("Q{} {}", quarter_of(start) + 1, start.year()),
    }
}

pub fn build_headers(
    columns: &[NaiveDate],
    granularity: Granularity,
    column_width: f32,
    today: NaiveDate,
) -> Vec<ColumnHeader> {
    columns
        .iter()
        .enumerate()
        .map(|(i, &start)| ColumnHeader {
            position: i as f32 * column_width,
            start,
            label: column_label(start, granularity),
            sublabel: column_sublabel(start, granularity),
            is_current: column_contains(start, granularity, today),
            days: day_tiles(start, granularity, today),
        })
        .collect()
}
