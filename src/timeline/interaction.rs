//! Pointer-driven move/resize of epic bars.
//!
//! One gesture at a time: `Idle → Dragging | Resizing → Idle`. Every pointer
//! move is measured against the date under the pointer at gesture start and
//! applied to the epic's dates as they were at gesture start, so a gesture
//! never compounds rounding from earlier frames.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use super::mapper::{rounded_days_between, CoordinateMapper};
use super::rows::RowLookup;
use crate::model::{Epic, EpicCommand, EpicPatch};

/// Which part of a bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Center,
}

/// State captured on pointer-down and discarded on release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub epic_id: Uuid,
    pub edge: Edge,
    /// Date under the pointer when the gesture began.
    pub origin: NaiveDateTime,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(DragSession),
}

impl Gesture {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(s) | Self::Resizing(s) => Some(s),
        }
    }
}

/// Pointer position: `x` in grid content pixels (scroll already applied),
/// `y` in the same space the row registry was filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    gesture: Gesture,
    hover_row: Option<Uuid>,
    placement_half_span: i64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(10)
    }
}

impl InteractionController {
    /// `placement_half_span_days` sizes the hover preview of unplaced epics.
    pub fn new(placement_half_span_days: i64) -> Self {
        Self {
            gesture: Gesture::Idle,
            hover_row: None,
            placement_half_span: placement_half_span_days.max(0),
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn is_dragging(&self, epic_id: Uuid) -> bool {
        matches!(&self.gesture, Gesture::Dragging(s) if s.epic_id == epic_id)
    }

    pub fn is_resizing(&self, epic_id: Uuid) -> bool {
        matches!(&self.gesture, Gesture::Resizing(s) if s.epic_id == epic_id)
    }

    /// Row currently under the pointer during a drag.
    pub fn hover_row(&self) -> Option<Uuid> {
        self.hover_row
    }

    /// Row to highlight as a drop target. Resizes never have one.
    pub fn drop_target(&self) -> Option<Uuid> {
        match self.gesture {
            Gesture::Dragging(_) => self.hover_row,
            _ => None,
        }
    }

    /// Begin a move (`Edge::Center`) or resize. Ignored unless idle and the
    /// epic has dates.
    pub fn pointer_down(
        &mut self,
        epic: &Epic,
        edge: Edge,
        pointer_x: f32,
        mapper: &CoordinateMapper,
    ) -> bool {
        if !self.is_idle() {
            debug!(epic_id = %epic.id, "pointer down ignored: gesture already active");
            return false;
        }
        let Some((original_start, original_end)) = epic.dates() else {
            return false;
        };

        let session = DragSession {
            epic_id: epic.id,
            edge,
            origin: mapper.x_to_datetime(pointer_x),
            original_start,
            original_end,
        };
        debug!(epic_id = %epic.id, ?edge, origin = %session.origin, "gesture started");
        self.gesture = match edge {
            Edge::Center => Gesture::Dragging(session),
            Edge::Left | Edge::Right => Gesture::Resizing(session),
        };
        true
    }

    /// Track the pointer. Returns the date update for this frame, if any.
    pub fn pointer_move(
        &mut self,
        pointer: Pointer,
        mapper: &CoordinateMapper,
        rows: &dyn RowLookup,
    ) -> Option<EpicCommand> {
        let session = self.gesture.session()?.clone();

        let row = rows.row_at(pointer.y);
        if row != self.hover_row {
            debug!(?row, "hover row changed");
            self.hover_row = row;
        }

        let current = mapper.x_to_datetime(pointer.x);
        let days = Duration::days(rounded_days_between(session.origin, current));

        let patch = match (&self.gesture, session.edge) {
            (Gesture::Dragging(_), _) => {
                EpicPatch::dates(session.original_start + days, session.original_end + days)
            }
            (Gesture::Resizing(_), Edge::Left) => {
                let start = session.original_start + days;
                if start >= session.original_end {
                    return None;
                }
                EpicPatch::start(start)
            }
            (Gesture::Resizing(_), _) => {
                let end = session.original_end + days;
                if end <= session.original_start {
                    return None;
                }
                EpicPatch::end(end)
            }
            (Gesture::Idle, _) => return None,
        };

        Some(EpicCommand::Update {
            epic_id: session.epic_id,
            patch,
        })
    }

    /// End the active gesture. Returns the session that was active.
    pub fn pointer_up(&mut self) -> Option<DragSession> {
        let gesture = std::mem::take(&mut self.gesture);
        let hover_row = self.hover_row.take();
        if let Gesture::Dragging(session) = &gesture {
            if let Some(row) = hover_row {
                // Moving an epic between rows is not supported; only reported.
                debug!(epic_id = %session.epic_id, %row, "drag released over row");
            }
        }
        let session = match gesture {
            Gesture::Idle => None,
            Gesture::Dragging(s) | Gesture::Resizing(s) => Some(s),
        };
        if let Some(s) = &session {
            debug!(epic_id = %s.epic_id, edge = ?s.edge, "gesture ended");
        }
        session
    }

    /// Pointer left the tracking surface. Same as releasing it.
    pub fn pointer_leave(&mut self) -> Option<DragSession> {
        self.pointer_up()
    }

    /// Hover preview for an unplaced epic: a range centered on the pointer date.
    pub fn placement_preview(
        &self,
        epic: &Epic,
        pointer_x: f32,
        mapper: &CoordinateMapper,
    ) -> Option<EpicCommand> {
        if epic.is_placed || !self.is_idle() {
            return None;
        }
        let (start, end) = self.centered_range(mapper.x_to_date(pointer_x));
        if epic.dates() == Some((start, end)) {
            return None;
        }
        Some(EpicCommand::Update {
            epic_id: epic.id,
            patch: EpicPatch::dates(start, end),
        })
    }

    /// Click inside an epic's row. Fixes an unplaced epic where it is.
    pub fn click_row(
        &self,
        epic: &Epic,
        pointer_x: f32,
        mapper: &CoordinateMapper,
    ) -> Option<EpicCommand> {
        if epic.is_placed || !self.is_idle() {
            return None;
        }
        let patch = match epic.dates() {
            Some(_) => EpicPatch::default(),
            None => {
                let (start, end) = self.centered_range(mapper.x_to_date(pointer_x));
                EpicPatch::dates(start, end)
            }
        }
        .with_placed(true);
        debug!(epic_id = %epic.id, "epic placed");
        Some(EpicCommand::Update {
            epic_id: epic.id,
            patch,
        })
    }

    fn centered_range(&self, center: NaiveDate) -> (NaiveDate, NaiveDate) {
        let half = Duration::days(self.placement_half_span);
        (center - half, center + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Board, EpicStore, Sprint};
    use crate::timeline::grid::VisibleRange;
    use crate::timeline::mapper::InverseMapping;
    use crate::timeline::rows::RowRegistry;
    use crate::timeline::Granularity;
    use egui::Color32;
    use proptest::prelude::*;

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

    /// Pixels per day under the linear inverse.
    fn px_per_day(mapper: &CoordinateMapper) -> f32 {
        mapper.total_width() / mapper.range().num_days() as f32
    }

    fn board_with_epic() -> (Board, Uuid, Uuid) {
        let mut board = Board::default();
        let mut sprint = Sprint::new("Sprint", d(2024, 3, 1), d(2024, 3, 14));
        let epic = Epic::placed("Epic", d(2024, 3, 1), d(2024, 3, 15), Color32::RED);
        let epic_id = epic.id;
        sprint.epics.push(epic);
        let sprint_id = board.add_sprint(sprint);
        (board, sprint_id, epic_id)
    }

    fn apply(board: &mut Board, command: Option<EpicCommand>) {
        if let Some(command) = command {
            board.apply(command).unwrap();
        }
    }

    #[test]
    fn drag_shifts_both_dates() {
        let m = mapper();
        let rows = RowRegistry::default();
        let (mut board, _, id) = board_with_epic();
        let mut ctl = InteractionController::default();

        assert!(ctl.pointer_down(board.epic(id).unwrap(), Edge::Center, 500.0, &m));
        assert!(ctl.is_dragging(id));

        let cmd = ctl.pointer_move(Pointer { x: 500.0 + 10.0 * px_per_day(&m), y: 0.0 }, &m, &rows);
        apply(&mut board, cmd);
        assert_eq!(board.epic(id).unwrap().dates(), Some((d(2024, 3, 11), d(2024, 3, 25))));

        assert!(ctl.pointer_up().is_some());
        assert!(ctl.is_idle());
    }

    #[test]
    fn second_pointer_down_is_rejected_while_active() {
        let m = mapper();
        let (board, _, id) = board_with_epic();
        let epic = board.epic(id).unwrap();
        let mut ctl = InteractionController::default();
        assert!(ctl.pointer_down(epic, Edge::Left, 100.0, &m));
        assert!(!ctl.pointer_down(epic, Edge::Center, 100.0, &m));
        assert!(ctl.is_resizing(id));
    }

    #[test]
    fn unplaced_epic_cannot_be_dragged() {
        let m = mapper();
        let epic = Epic::new("Loose", Color32::RED);
        let mut ctl = InteractionController::default();
        assert!(!ctl.pointer_down(&epic, Edge::Center, 100.0, &m));
        assert!(ctl.is_idle());
    }

    #[test]
    fn left_resize_past_end_is_dropped_then_resumes() {
        let m = mapper();
        let rows = RowRegistry::default();
        let (mut board, _, id) = board_with_epic();
        let mut ctl = InteractionController::default();
        let ppd = px_per_day(&m);

        ctl.pointer_down(board.epic(id).unwrap(), Edge::Left, 500.0, &m);
        assert_eq!(ctl.pointer_move(Pointer { x: 500.0 + 20.0 * ppd, y: 0.0 }, &m, &rows), None);
        assert!(ctl.is_resizing(id));

        let cmd = ctl.pointer_move(Pointer { x: 500.0 + 3.0 * ppd, y: 0.0 }, &m, &rows);
        apply(&mut board, cmd);
        assert_eq!(board.epic(id).unwrap().dates(), Some((d(2024, 3, 4), d(2024, 3, 15))));
    }

    #[test]
    fn right_resize_only_touches_end() {
        let m = mapper();
        let rows = RowRegistry::default();
        let (mut board, _, id) = board_with_epic();
        let mut ctl = InteractionController::default();
        let ppd = px_per_day(&m);

        ctl.pointer_down(board.epic(id).unwrap(), Edge::Right, 700.0, &m);
        assert_eq!(ctl.pointer_move(Pointer { x: 700.0 - 14.0 * ppd, y: 0.0 }, &m, &rows), None);
        let cmd = ctl.pointer_move(Pointer { x: 700.0 + 5.0 * ppd, y: 0.0 }, &m, &rows);
        assert_eq!(
            cmd,
            Some(EpicCommand::Update { epic_id: id, patch: EpicPatch::end(d(2024, 3, 20)) })
        );
    }

    #[test]
    fn leaving_the_surface_cancels_like_release() {
        let m = mapper();
        let rows = RowRegistry::default();
        let (board, _, id) = board_with_epic();
        let mut ctl = InteractionController::default();
        ctl.pointer_down(board.epic(id).unwrap(), Edge::Center, 500.0, &m);
        let session = ctl.pointer_leave().unwrap();
        assert_eq!(session.epic_id, id);
        assert!(ctl.is_idle());
        assert_eq!(ctl.pointer_move(Pointer { x: 900.0, y: 0.0 }, &m, &rows), None);
        assert_eq!(ctl.pointer_up(), None);
    }

    #[test]
    fn hover_row_follows_pointer_during_drag() {
        let m = mapper();
        let (board, sprint_id, id) = board_with_epic();
        let other = Uuid::new_v4();
        let mut rows = RowRegistry::default();
        rows.register(sprint_id, 0.0, 48.0);
        rows.register(other, 48.0, 96.0);

        let mut ctl = InteractionController::default();
        ctl.pointer_down(board.epic(id).unwrap(), Edge::Center, 500.0, &m);
        ctl.pointer_move(Pointer { x: 500.0, y: 20.0 }, &m, &rows);
        assert_eq!(ctl.hover_row(), Some(sprint_id));
        ctl.pointer_move(Pointer { x: 500.0, y: 70.0 }, &m, &rows);
        assert_eq!(ctl.hover_row(), Some(other));
        ctl.pointer_up();
        assert_eq!(ctl.hover_row(), None);
        // Release does not move the epic to another sprint.
        assert_eq!(board.sprint_of(id).unwrap().id, sprint_id);
    }

    #[test]
    fn only_drags_have_a_drop_target() {
        let m = mapper();
        let (board, sprint_id, id) = board_with_epic();
        let mut rows = RowRegistry::default();
        rows.register(sprint_id, 0.0, 48.0);
        let epic = board.epic(id).unwrap();

        let mut ctl = InteractionController::default();
        ctl.pointer_down(epic, Edge::Right, 500.0, &m);
        ctl.pointer_move(Pointer { x: 520.0, y: 20.0 }, &m, &rows);
        assert_eq!(ctl.drop_target(), None);
        ctl.pointer_up();

        ctl.pointer_down(epic, Edge::Center, 500.0, &m);
        ctl.pointer_move(Pointer { x: 520.0, y: 20.0 }, &m, &rows);
        assert_eq!(ctl.drop_target(), Some(sprint_id));
        ctl.pointer_up();
        assert_eq!(ctl.drop_target(), None);
    }

    #[test]
    fn unplaced_epic_previews_then_places_on_click() {
        let m = mapper();
        let (mut board, sprint_id, _) = board_with_epic();
        let id = board.create_epic(sprint_id, "New").unwrap();
        let ctl = InteractionController::new(10);

        let x = m.date_to_x(d(2024, 6, 15)) + 0.5;
        let center = m.x_to_date(x);
        let cmd = ctl.placement_preview(board.epic(id).unwrap(), x, &m);
        apply(&mut board, cmd);
        let epic = board.epic(id).unwrap();
        assert_eq!(
            epic.dates(),
            Some((center - Duration::days(10), center + Duration::days(10)))
        );
        assert!(!epic.is_placed);

        let cmd = ctl.click_row(epic, x, &m);
        apply(&mut board, cmd);
        let epic = board.epic(id).unwrap();
        assert!(epic.is_placed);
        assert_eq!(ctl.placement_preview(epic, x + 300.0, &m), None);
        assert_eq!(ctl.click_row(epic, x, &m), None);
    }

    #[test]
    fn click_without_preview_still_assigns_dates() {
        let m = mapper();
        let epic = Epic::new("Fresh", Color32::RED);
        let ctl = InteractionController::new(5);
        let Some(EpicCommand::Update { patch, .. }) = ctl.click_row(&epic, 1200.0, &m) else {
            panic!("expected an update");
        };
        assert_eq!(patch.is_placed, Some(true));
        assert_eq!(patch.start_date, Some(d(2024, 6, 26)));
        assert_eq!(patch.end_date, Some(d(2024, 7, 6)));
    }

    proptest! {
        #[test]
        fn drag_delta_has_no_compounding_drift(
            moves in prop::collection::vec(-2000.0f32..2000.0, 0..30),
            days in -60i64..60,
        ) {
            let m = mapper();
            let rows = RowRegistry::default();
            let (mut board, _, id) = board_with_epic();
            let mut ctl = InteractionController::default();
            let start_x = 600.0;

            ctl.pointer_down(board.epic(id).unwrap(), Edge::Center, start_x, &m);
            for x in moves {
                let cmd = ctl.pointer_move(Pointer { x, y: 0.0 }, &m, &rows);
                apply(&mut board, cmd);
            }
            let final_x = start_x + days as f32 * px_per_day(&m);
            let cmd = ctl.pointer_move(Pointer { x: final_x, y: 0.0 }, &m, &rows);
            apply(&mut board, cmd);

            prop_assert_eq!(
                board.epic(id).unwrap().dates(),
                Some((
                    d(2024, 3, 1) + Duration::days(days),
                    d(2024, 3, 15) + Duration::days(days),
                ))
            );
        }

        #[test]
        fn left_resize_never_inverts(
            moves in prop::collection::vec(-3000.0f32..3000.0, 1..40),
        ) {
            let m = mapper();
            let rows = RowRegistry::default();
            let (mut board, _, id) = board_with_epic();
            let mut ctl = InteractionController::default();

            ctl.pointer_down(board.epic(id).unwrap(), Edge::Left, 400.0, &m);
            for x in moves {
                let cmd = ctl.pointer_move(Pointer { x, y: 0.0 }, &m, &rows);
                apply(&mut board, cmd);
                let (start, end) = board.epic(id).unwrap().dates().unwrap();
                prop_assert!(start < end);
            }
        }
    }
}
