use chrono::NaiveDate;
use tracing::debug;

use super::mapper::CoordinateMapper;

/// Horizontal scroll offset that puts `today` at `fraction` of the viewport
/// width from its left edge. `None` when no column contains today.
pub fn today_scroll_offset(
    mapper: &CoordinateMapper,
    today: NaiveDate,
    viewport_width: f32,
    fraction: f32,
) -> Option<f32> {
    mapper.column_index_of(today)?;
    let x = mapper.date_to_x(today);
    Some((x - viewport_width * fraction).max(0.0))
}

/// Deferred "scroll to today". A request fires once `delay` seconds have
/// passed, giving layout a frame to settle.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    requested_at: Option<f64>,
    delay: f64,
    fraction: f32,
}

impl AutoScroller {
    pub fn new(delay_secs: f64, fraction: f32) -> Self {
        Self {
            requested_at: None,
            delay: delay_secs.max(0.0),
            fraction,
        }
    }

    /// Schedule a scroll. A newer request replaces a pending one.
    pub fn request(&mut self, now: f64) {
        self.requested_at = Some(now);
    }

    /// Seconds until the pending request fires.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.requested_at
            .map(|at| (at + self.delay - now).max(0.0))
    }

    /// Offset to scroll to, once the delay has elapsed. Consumes the request
    /// even when today is not on the grid, leaving the scroll where it is.
    pub fn poll(
        &mut self,
        now: f64,
        mapper: &CoordinateMapper,
        today: NaiveDate,
        viewport_width: f32,
    ) -> Option<f32> {
        let at = self.requested_at?;
        if now - at < self.delay {
            return None;
        }
        self.requested_at = None;
        let offset = today_scroll_offset(mapper, today, viewport_width, self.fraction);
        debug!(?offset, "scroll to today");
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::grid::VisibleRange;
    use crate::timeline::mapper::InverseMapping;
    use crate::timeline::Granularity;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(
            VisibleRange::new(d(2024, 1, 1), d(2024, 12, 31)),
            Granularity::Months,
            200.0,
            InverseMapping::Linear,
        )
    }

    #[test]
    fn offset_places_today_near_left_edge() {
        let offset = today_scroll_offset(&mapper(), d(2024, 7, 1), 600.0, 1.0 / 6.0).unwrap();
        assert!((offset - 1100.0).abs() < 1e-3);
    }

    #[test]
    fn offset_never_negative() {
        assert_eq!(today_scroll_offset(&mapper(), d(2024, 1, 2), 1200.0, 0.5), Some(0.0));
    }

    #[test]
    fn today_off_grid_leaves_scroll_alone() {
        assert_eq!(today_scroll_offset(&mapper(), d(2026, 1, 1), 600.0, 0.5), None);
    }

    #[test]
    fn request_fires_after_delay_once() {
        let m = mapper();
        let mut scroller = AutoScroller::new(0.1, 0.0);
        assert_eq!(scroller.poll(0.0, &m, d(2024, 3, 1), 600.0), None);

        scroller.request(1.0);
        assert!(scroller.remaining(1.0).is_some());
        assert_eq!(scroller.poll(1.05, &m, d(2024, 3, 1), 600.0), None);
        assert!((scroller.remaining(1.05).unwrap() - 0.05).abs() < 1e-9);
        assert_eq!(scroller.poll(1.2, &m, d(2024, 3, 1), 600.0), Some(400.0));
        assert_eq!(scroller.remaining(2.0), None);
        assert_eq!(scroller.poll(1.3, &m, d(2024, 3, 1), 600.0), None);
    }

    #[test]
    fn off_grid_request_is_still_consumed() {
        let m = mapper();
        let mut scroller = AutoScroller::new(0.0, 0.0);
        scroller.request(0.0);
        assert_eq!(scroller.poll(0.0, &m, d(2030, 1, 1), 600.0), None);
        assert_eq!(scroller.remaining(2.0), None);
    }
}
