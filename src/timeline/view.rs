use chrono::NaiveDate;
use tracing::info;

use super::autoscroll::AutoScroller;
use super::geometry::{bar_geometry, BarView};
use super::grid::{ColumnHeader, VisibleRange};
use super::interaction::{DragSession, Edge, InteractionController, Pointer};
use super::mapper::CoordinateMapper;
use super::rows::RowRegistry;
use super::Granularity;
use crate::config::TimelineSettings;
use crate::model::{Epic, EpicCommand};

/// Timeline state for one session: the grid, the active gesture, row bands
/// and pending autoscroll. Holds no epics; geometry is recomputed from the
/// store every frame.
#[derive(Debug, Clone)]
pub struct TimelineView {
    mapper: CoordinateMapper,
    controller: InteractionController,
    rows: RowRegistry,
    autoscroll: AutoScroller,
    min_bar_width: f32,
    mounted: bool,
}

impl TimelineView {
    /// The visible range is fixed here, around `today`, for the whole session.
    pub fn new(settings: &TimelineSettings, today: NaiveDate) -> Self {
        let range = VisibleRange::around(today, settings.years_back, settings.years_forward);
        Self {
            mapper: CoordinateMapper::new(
                range,
                settings.default_granularity,
                settings.column_width,
                settings.inverse_mapping,
            ),
            controller: InteractionController::new(settings.placement_half_span_days),
            rows: RowRegistry::default(),
            autoscroll: AutoScroller::new(
                settings.autoscroll_delay_secs,
                settings.today_scroll_fraction,
            ),
            min_bar_width: settings.min_bar_width,
            mounted: false,
        }
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Row bands, refilled by the canvas each frame.
    pub fn rows_mut(&mut self) -> &mut RowRegistry {
        &mut self.rows
    }

    pub fn granularity(&self) -> Granularity {
        self.mapper.granularity()
    }

    /// First frame: schedule the initial scroll to today.
    pub fn mount(&mut self, now: f64) {
        if !self.mounted {
            self.mounted = true;
            self.autoscroll.request(now);
        }
    }

    /// Change zoom level. Regenerates columns, cancels any gesture measured
    /// against the old grid and re-centers on today.
    pub fn set_granularity(&mut self, granularity: Granularity, now: f64) {
        if granularity == self.mapper.granularity() {
            return;
        }
        self.controller.pointer_leave();
        self.mapper.set_granularity(granularity);
        info!(granularity = granularity.label(), columns = self.mapper.columns().len(), "granularity changed");
        self.autoscroll.request(now);
    }

    pub fn scroll_to_today(&mut self, now: f64) {
        self.autoscroll.request(now);
    }

    /// Offset to apply to the horizontal scroll this frame, if a request is due.
    pub fn poll_autoscroll(&mut self, now: f64, today: NaiveDate, viewport_width: f32) -> Option<f32> {
        self.autoscroll.poll(now, &self.mapper, today, viewport_width)
    }

    /// Seconds until a pending autoscroll is due.
    pub fn autoscroll_remaining(&self, now: f64) -> Option<f64> {
        self.autoscroll.remaining(now)
    }

    pub fn pointer_down(&mut self, epic: &Epic, edge: Edge, x: f32) -> bool {
        self.controller.pointer_down(epic, edge, x, &self.mapper)
    }

    pub fn pointer_move(&mut self, pointer: Pointer) -> Option<EpicCommand> {
        self.controller.pointer_move(pointer, &self.mapper, &self.rows)
    }

    pub fn pointer_up(&mut self) -> Option<DragSession> {
        self.controller.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> Option<DragSession> {
        self.controller.pointer_leave()
    }

    pub fn placement_preview(&self, epic: &Epic, x: f32) -> Option<EpicCommand> {
        self.controller.placement_preview(epic, x, &self.mapper)
    }

    pub fn click_row(&self, epic: &Epic, x: f32) -> Option<EpicCommand> {
        self.controller.click_row(epic, x, &self.mapper)
    }

    pub fn headers(&self, today: NaiveDate) -> Vec<ColumnHeader> {
        self.mapper.headers(today)
    }

    pub fn total_width(&self) -> f32 {
        self.mapper.total_width()
    }

    pub fn today_marker(&self, today: NaiveDate) -> Option<f32> {
        self.mapper.today_position(today)
    }

    /// Bar for `epic`, or `None` when it has no dates or the grid is empty.
    pub fn bar(&self, epic: &Epic) -> Option<BarView> {
        let (start, end) = epic.dates()?;
        let geometry = bar_geometry(&self.mapper, start, end, self.min_bar_width)?;
        Some(BarView {
            epic_id: epic.id,
            geometry,
            background: epic.color,
            is_dragging: self.controller.is_dragging(epic.id),
            is_resizing: self.controller.is_resizing(epic.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_range_spans_three_years() {
        let view = TimelineView::new(&TimelineSettings::default(), d(2024, 6, 15));
        let range = view.mapper().range();
        assert_eq!(range.start, d(2023, 6, 15));
        assert_eq!(range.end, d(2026, 6, 15));
        assert_eq!(view.granularity(), Granularity::Months);
        assert_eq!(view.mapper().columns().len(), 37);
    }

    #[test]
    fn today_marker_missing_when_range_ends_before_today() {
        let settings = TimelineSettings {
            years_back: 3,
            years_forward: 0,
            ..Default::default()
        };
        let view = TimelineView::new(&settings, d(2024, 6, 15));
        assert_eq!(view.today_marker(d(2024, 6, 16)), None);
        assert!(view.today_marker(d(2024, 6, 15)).is_some());
    }

    #[test]
    fn bar_reflects_gesture_state() {
        let mut view = TimelineView::new(&TimelineSettings::default(), d(2024, 6, 15));
        let epic = Epic::placed("E", d(2024, 6, 1), d(2024, 6, 30), Color32::RED);
        let bar = view.bar(&epic).unwrap();
        assert!(!bar.is_dragging && !bar.is_resizing);
        assert_eq!(bar.background, Color32::RED);

        let x = bar.geometry.left + 10.0;
        assert!(view.pointer_down(&epic, Edge::Right, x));
        let bar = view.bar(&epic).unwrap();
        assert!(bar.is_resizing && !bar.is_dragging);

        assert_eq!(view.bar(&Epic::new("loose", Color32::RED)), None);
    }

    #[test]
    fn granularity_change_cancels_gesture_and_schedules_scroll() {
        let mut view = TimelineView::new(&TimelineSettings::default(), d(2024, 6, 15));
        let epic = Epic::placed("E", d(2024, 6, 1), d(2024, 6, 30), Color32::RED);
        assert!(view.pointer_down(&epic, Edge::Center, 100.0));

        view.set_granularity(Granularity::Quarters, 5.0);
        assert!(view.controller().is_idle());
        assert_eq!(view.mapper().columns().len(), 13);
        assert_eq!(view.poll_autoscroll(5.0, d(2024, 6, 15), 600.0), None);
        assert!(view.poll_autoscroll(5.2, d(2024, 6, 15), 600.0).is_some());
    }

    #[test]
    fn mount_requests_scroll_once() {
        let mut view = TimelineView::new(&TimelineSettings::default(), d(2024, 6, 15));
        view.mount(0.0);
        assert!(view.poll_autoscroll(1.0, d(2024, 6, 15), 600.0).is_some());
        view.mount(2.0);
        assert_eq!(view.poll_autoscroll(3.0, d(2024, 6, 15), 600.0), None);
    }
}
