//! Date ↔ pixel conversion over the generated column grid.
//!
//! Every column is drawn at the same pixel width, but columns stand for
//! different numbers of days (28-31 for months, 90-92 for quarters, 7 for
//! weeks). The forward direction therefore scales by the exact day count of
//! the column a date falls in.
//!
//! The inverse direction defaults to [`InverseMapping::Linear`]: a uniform
//! interpolation across the whole visible range. It ignores per-column day
//! counts, so the date under the pointer can drift by a few days from where a
//! bar is drawn at month or quarter granularity. Drags only ever use the
//! *difference* between two inverse-mapped dates, which keeps the drift from
//! accumulating. [`InverseMapping::ColumnExact`] walks the grid instead and is
//! the exact inverse of [`CoordinateMapper::date_to_x`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::calendar::{column_days, column_span};
use super::grid::{build_headers, generate_columns, ColumnHeader, VisibleRange};
use super::Granularity;

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InverseMapping {
    /// Uniform interpolation over the visible range.
    #[default]
    Linear,
    /// Column-aware inverse of the forward mapping.
    ColumnExact,
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Converts between calendar dates and content-space x offsets.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    range: VisibleRange,
    granularity: Granularity,
    columns: Vec<NaiveDate>,
    column_width: f32,
    inverse: InverseMapping,
}

impl CoordinateMapper {
    pub fn new(
        range: VisibleRange,
        granularity: Granularity,
        column_width: f32,
        inverse: InverseMapping,
    ) -> Self {
        Self {
            range,
            granularity,
            columns: generate_columns(range.start, range.end, granularity),
            column_width,
            inverse,
        }
    }

    /// Switch zoom level. Columns are regenerated.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.columns = generate_columns(self.range.start, self.range.end, granularity);
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn columns(&self) -> &[NaiveDate] {
        &self.columns
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn total_width(&self) -> f32 {
        self.columns.len() as f32 * self.column_width
    }

    pub fn headers(&self, today: NaiveDate) -> Vec<ColumnHeader> {
        build_headers(&self.columns, self.granularity, self.column_width, today)
    }

    /// Index of the column whose span contains `date`.
    pub fn column_index_of(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.columns.partition_point(|c| column_span(*c, self.granularity).0 <= date);
        let idx = idx.checked_sub(1)?;
        let (_, last) = column_span(self.columns[idx], self.granularity);
        (date <= last).then_some(idx)
    }

    /// x offset of the start of `date`.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        self.offset_of(date, 0)
    }

    /// x offset of the end of `date`, i.e. the start of the following day
    /// measured in `date`'s own column.
    pub fn date_end_to_x(&self, date: NaiveDate) -> f32 {
        self.offset_of(date, 1)
    }

    fn offset_of(&self, date: NaiveDate, extra_days: i64) -> f32 {
        match self.column_index_of(date) {
            Some(i) => {
                let column = self.columns[i];
                let (first, _) = column_span(column, self.granularity);
                let days = (date - first).num_days() + extra_days;
                let total = column_days(column, self.granularity) as f32;
                i as f32 * self.column_width + days as f32 / total * self.column_width
            }
            None => self.proportional_x(date + Duration::days(extra_days)),
        }
    }

    /// Fallback estimate for dates no column contains.
    fn proportional_x(&self, date: NaiveDate) -> f32 {
        let span = self.range.num_days();
        if span <= 0 {
            return 0.0;
        }
        let offset = (date - self.range.start).num_days();
        offset as f32 / span as f32 * self.total_width()
    }

    /// Date under content x offset `x`.
    pub fn x_to_datetime(&self, x: f32) -> NaiveDateTime {
        match self.inverse {
            InverseMapping::Linear => self.linear_x_to_datetime(x),
            InverseMapping::ColumnExact => self.exact_x_to_datetime(x),
        }
    }

    fn linear_x_to_datetime(&self, x: f32) -> NaiveDateTime {
        let origin = midnight(self.range.start);
        let width = self.total_width();
        if width <= 0.0 {
            return origin;
        }
        let percentage = x as f64 / width as f64;
        let range_ms = self.range.num_days() as f64 * MS_PER_DAY;
        origin + Duration::milliseconds((percentage * range_ms).round() as i64)
    }

    fn exact_x_to_datetime(&self, x: f32) -> NaiveDateTime {
        if self.columns.is_empty() || self.column_width <= 0.0 {
            return midnight(self.range.start);
        }
        let last = self.columns.len() - 1;
        let raw = (x / self.column_width).floor();
        let idx = if raw < 0.0 { 0 } else { (raw as usize).min(last) };
        let column = self.columns[idx];
        let (first, _) = column_span(column, self.granularity);
        let fraction = (x as f64 - idx as f64 * self.column_width as f64) / self.column_width as f64;
        let days = fraction * column_days(column, self.granularity) as f64;
        midnight(first) + Duration::milliseconds((days * MS_PER_DAY).round() as i64)
    }

    /// Date (rounded down to the day) under content x offset `x`.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        self.x_to_datetime(x).date()
    }

    /// Marker position for `today`, or `None` when it should not be drawn.
    pub fn today_position(&self, today: NaiveDate) -> Option<f32> {
        if self.columns.is_empty() || !self.range.contains(today) {
            return None;
        }
        Some(self.date_to_x(today))
    }
}

/// Signed whole days between two instants, rounded to the nearest day.
pub fn rounded_days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    ((to - from).num_milliseconds() as f64 / MS_PER_DAY).round() as i64
}
