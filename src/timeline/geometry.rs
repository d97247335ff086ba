use chrono::NaiveDate;
use egui::Color32;
use uuid::Uuid;

use super::mapper::CoordinateMapper;

/// Horizontal placement of an epic bar in content pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Everything the canvas needs to paint one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub epic_id: Uuid,
    pub geometry: BarGeometry,
    pub background: Color32,
    pub is_dragging: bool,
    pub is_resizing: bool,
}

/// Bar placement for an epic spanning `start..=end`.
///
/// Dates are clamped to the visible range first, so bars running off either
/// edge are truncated there. The right edge includes the whole end day. Width
/// never drops below `min_width`. Returns `None` until columns exist.
pub fn bar_geometry(
    mapper: &CoordinateMapper,
    start: NaiveDate,
    end: NaiveDate,
    min_width: f32,
) -> Option<BarGeometry> {
    if mapper.is_empty() {
        return None;
    }
    let range = mapper.range();
    let left = mapper.date_to_x(range.clamp(start));
    let right = mapper.date_end_to_x(range.clamp(end));
    Some(BarGeometry {
        left,
        width: (right - left).max(min_width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::grid::VisibleRange;
    use crate::timeline::mapper::InverseMapping;
    use crate::timeline::Granularity;
    use chrono::Duration;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn mapper(granularity: Granularity) -> CoordinateMapper {
        CoordinateMapper::new(
            VisibleRange::new(d(2024, 1, 1), d(2024, 12, 31)),
            granularity,
            200.0,
            InverseMapping::Linear,
        )
    }

    #[test]
    fn full_month_spans_one_column() {
        let geom = bar_geometry(&mapper(Granularity::Months), d(2024, 3, 1), d(2024, 3, 31), 50.0)
            .unwrap();
        assert_eq!(geom.left, 400.0);
        assert!((geom.width - 200.0).abs() < 1e-3);
        assert!((geom.right() - 600.0).abs() < 1e-3);
    }

    #[test]
    fn short_items_get_minimum_width() {
        let geom = bar_geometry(&mapper(Granularity::Quarters), d(2024, 5, 2), d(2024, 5, 3), 50.0)
            .unwrap();
        assert_eq!(geom.width, 50.0);
    }

    #[test]
    fn out_of_range_dates_are_clamped() {
        let m = mapper(Granularity::Months);
        let geom = bar_geometry(&m, d(2023, 6, 1), d(2025, 6, 1), 50.0).unwrap();
        assert_eq!(geom.left, 0.0);
        assert!((geom.right() - m.total_width()).abs() < 1e-3);
    }

    #[test]
    fn no_columns_no_geometry() {
        let m = CoordinateMapper::new(
            VisibleRange::new(d(2024, 12, 31), d(2024, 1, 1)),
            Granularity::Weeks,
            200.0,
            InverseMapping::Linear,
        );
        assert_eq!(bar_geometry(&m, d(2024, 3, 1), d(2024, 3, 5), 50.0), None);
    }

    proptest! {
        #[test]
        fn width_never_below_minimum(
            start in -400i64..800,
            end in -400i64..800,
            granularity in prop_oneof![
                Just(Granularity::Weeks),
                Just(Granularity::Months),
                Just(Granularity::Quarters),
            ],
        ) {
            let m = mapper(granularity);
            let base = d(2024, 1, 1);
            let geom = bar_geometry(
                &m,
                base + Duration::days(start),
                base + Duration::days(end),
                50.0,
            ).unwrap();
            prop_assert!(geom.width >= 50.0);
        }
    }
}
