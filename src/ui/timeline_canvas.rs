use crate::model::{Board, Epic, EpicCommand};
use crate::timeline::interaction::DragSession;
use crate::timeline::{BarView, ColumnHeader, Edge, Pointer, TimelineView};
use crate::ui::theme;
use chrono::{Datelike, NaiveDate};
use egui::{Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;
const DELETE_SIZE: f32 = 14.0;
/// Offset of the day-tile strip inside a week header.
const DAY_TILE_TOP: f32 = 22.0;

/// Result details from interactions on the timeline.
#[derive(Debug, Default)]
pub struct CanvasInteraction {
    /// Store mutations produced this frame, in order.
    pub commands: Vec<EpicCommand>,
    pub select: Option<Uuid>,
    pub clear_selection: bool,
    /// Double-click on empty space below the rows: create an epic here.
    pub create_at: Option<NaiveDate>,
    /// Gesture released this frame.
    pub finished: Option<DragSession>,
}

/// Render the scrollable timeline: header, grid, today marker and one row per
/// epic. Pointer input is forwarded to `view`; any resulting mutations come
/// back as commands for the store.
pub fn show_timeline_canvas(
    board: &Board,
    view: &mut TimelineView,
    selected: Option<Uuid>,
    today: NaiveDate,
    ui: &mut Ui,
) -> CanvasInteraction {
    let mut interaction = CanvasInteraction::default();
    let available = ui.available_size();
    let now = ui.input(|i| i.time);

    view.mount(now);
    let scroll_to = view.poll_autoscroll(now, today, available.x);
    if let Some(remaining) = view.autoscroll_remaining(now) {
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_secs_f64(remaining));
    }

    let epics: Vec<&Epic> = board.epics().collect();
    let chart_width = view.total_width().max(available.x);
    let chart_height = (HEADER_HEIGHT + epics.len() as f32 * ROW_HEIGHT + 40.0).max(available.y);

    let mut scroll = egui::ScrollArea::both()
        .id_salt("timeline")
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if let Some(offset) = scroll_to {
        scroll = scroll.horizontal_scroll_offset(offset);
    }

    scroll.show(ui, |ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::click());
        let origin = response.rect.min;
        let viewport = ui.clip_rect();
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        // Row bands first so drag hit-testing sees this frame's layout.
        view.rows_mut().clear();
        for (i, epic) in epics.iter().enumerate() {
            let top = row_top(origin, i);
            view.rows_mut().register(epic.id, top, top + ROW_HEIGHT);
        }

        let headers = view.headers(today);
        draw_grid(&painter, origin, &headers, view.mapper().column_width(), chart_height);

        let drop_row = view.controller().drop_target();

        for (i, epic) in epics.iter().enumerate() {
            let top = row_top(origin, i);
            let row_rect =
                Rect::from_min_size(Pos2::new(origin.x, top), Vec2::new(chart_width, ROW_HEIGHT));

            let row_response = ui.interact(
                row_rect,
                ui.make_persistent_id(("epic-row", epic.id)),
                Sense::click(),
            );
            let row_bg = if drop_row == Some(epic.id) {
                Some(theme::BG_ROW_DROP)
            } else if selected == Some(epic.id) || row_response.hovered() {
                Some(theme::BG_ROW_HOVER)
            } else {
                None
            };
            if let Some(fill) = row_bg {
                painter.rect_filled(row_rect, 0.0, fill);
            }
            painter.line_segment(
                [
                    Pos2::new(origin.x, top + ROW_HEIGHT),
                    Pos2::new(origin.x + chart_width, top + ROW_HEIGHT),
                ],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );

            if !epic.is_placed {
                let pointer_x = row_response.hover_pos().map(|p| p.x - origin.x);
                if let Some(x) = pointer_x {
                    if row_response.clicked() {
                        interaction.commands.extend(view.click_row(epic, x));
                        interaction.select = Some(epic.id);
                        consumed_click = true;
                    } else {
                        interaction.commands.extend(view.placement_preview(epic, x));
                    }
                }
                if epic.dates().is_none() {
                    painter.text(
                        Pos2::new(viewport.left() + 12.0, top + ROW_HEIGHT / 2.0),
                        egui::Align2::LEFT_CENTER,
                        format!("{}: hover to preview, click to place", epic.name),
                        theme::font_sub(),
                        theme::TEXT_DIM,
                    );
                }
            } else if row_response.clicked() {
                interaction.select = Some(epic.id);
                consumed_click = true;
            }

            let Some(bar) = view.bar(epic) else {
                continue;
            };
            let bar_rect = bar_rect(origin, top, &bar);
            draw_bar(&painter, &bar, &epic.name, bar_rect, epic.is_placed, selected == Some(epic.id));

            if !epic.is_placed {
                continue;
            }

            let bar_response = ui.interact(
                bar_rect,
                ui.make_persistent_id(("epic-bar", bar.epic_id)),
                Sense::click_and_drag(),
            );
            let left_response = ui.interact(
                handle_rect(bar_rect.left(), bar_rect).expand(4.0),
                ui.make_persistent_id(("epic-resize-left", epic.id)),
                Sense::drag(),
            );
            let right_response = ui.interact(
                handle_rect(bar_rect.right(), bar_rect).expand(4.0),
                ui.make_persistent_id(("epic-resize-right", epic.id)),
                Sense::drag(),
            );

            let grab = [
                (&left_response, Edge::Left),
                (&right_response, Edge::Right),
                (&bar_response, Edge::Center),
            ]
            .into_iter()
            .find(|(r, _)| r.drag_started());
            if let Some((response, edge)) = grab {
                if let Some(pos) = response.interact_pointer_pos() {
                    view.pointer_down(epic, edge, pos.x - origin.x);
                }
                interaction.select = Some(epic.id);
                consumed_click = true;
            }

            if bar_response.clicked() {
                interaction.select = Some(epic.id);
                consumed_click = true;
            }

            let on_handle = left_response.hovered() || right_response.hovered();
            if on_handle {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            } else if bar_response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }

            let show_affordances = view.controller().is_idle()
                && (selected == Some(epic.id) || bar_response.hovered() || on_handle);
            if show_affordances {
                draw_handles(&painter, bar_rect);

                let delete_rect = Rect::from_center_size(
                    Pos2::new(bar_rect.right() - HANDLE_WIDTH - DELETE_SIZE / 2.0, bar_rect.center().y),
                    Vec2::splat(DELETE_SIZE),
                );
                let delete_response = ui.interact(
                    delete_rect,
                    ui.make_persistent_id(("epic-delete", epic.id)),
                    Sense::click(),
                );
                draw_delete(&painter, delete_rect, delete_response.hovered());
                if delete_response.on_hover_text("Delete epic").clicked() {
                    interaction.commands.push(EpicCommand::Delete { epic_id: epic.id });
                    consumed_click = true;
                }
            }
            if bar_response.hovered() && view.controller().is_idle() {
                show_bar_tooltip(ui, epic);
            }
        }

        draw_header(&painter, origin, &headers, view.mapper().column_width(), chart_width);
        if let Some(x) = view.today_marker(today) {
            draw_today_line(&painter, origin, x, chart_height);
        }

        track_gesture(view, origin, viewport, ui, &mut interaction);

        // Empty click on background clears selection
        if response.clicked() && !consumed_click {
            interaction.clear_selection = true;
        }
        if response.double_clicked() && !consumed_click {
            let rows_bottom = row_top(origin, epics.len());
            if let Some(pos) = response.interact_pointer_pos().filter(|p| p.y > rows_bottom) {
                interaction.create_at = Some(view.mapper().x_to_date(pos.x - origin.x));
            }
        }
    });

    interaction
}

/// Feed the active gesture with this frame's pointer, and end it on release
/// or once the pointer leaves the visible timeline.
fn track_gesture(
    view: &mut TimelineView,
    origin: Pos2,
    viewport: Rect,
    ui: &Ui,
    interaction: &mut CanvasInteraction,
) {
    if view.controller().is_idle() {
        return;
    }

    let (pos, released) = ui.input(|i| {
        (
            i.pointer.latest_pos(),
            i.pointer.any_released() || !i.pointer.primary_down(),
        )
    });

    match pos.filter(|p| viewport.contains(*p)) {
        Some(p) => {
            interaction.commands.extend(view.pointer_move(Pointer {
                x: p.x - origin.x,
                y: p.y,
            }));
            if released {
                interaction.finished = view.pointer_up();
            } else {
                let cursor = match view.controller().gesture().session().map(|s| s.edge) {
                    Some(Edge::Center) => egui::CursorIcon::Grabbing,
                    _ => egui::CursorIcon::ResizeHorizontal,
                };
                ui.ctx().set_cursor_icon(cursor);
            }
        }
        None => {
            interaction.finished = view.pointer_leave();
        }
    }
}

fn row_top(origin: Pos2, index: usize) -> f32 {
    origin.y + HEADER_HEIGHT + index as f32 * ROW_HEIGHT
}

fn bar_rect(origin: Pos2, row_top: f32, bar: &BarView) -> Rect {
    let inset = theme::BAR_INSET;
    Rect::from_min_max(
        Pos2::new(origin.x + bar.geometry.left, row_top + inset),
        Pos2::new(origin.x + bar.geometry.right(), row_top + ROW_HEIGHT - inset),
    )
}

fn handle_rect(edge_x: f32, bar_rect: Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(edge_x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(edge_x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
}

fn draw_grid(painter: &Painter, origin: Pos2, headers: &[ColumnHeader], column_width: f32, height: f32) {
    for header in headers {
        let x = origin.x + header.position;
        if header.is_current {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(x, origin.y + HEADER_HEIGHT),
                    Vec2::new(column_width, height - HEADER_HEIGHT),
                ),
                0.0,
                Color32::from_white_alpha(3),
            );
        }
        // Heavier line where a new year begins.
        let stroke = if header.start.month() == 1 && header.start.day() <= 7 {
            Stroke::new(1.0, theme::BORDER_SUBTLE)
        } else {
            Stroke::new(0.5, theme::GRID_LINE)
        };
        painter.line_segment(
            [
                Pos2::new(x, origin.y + HEADER_HEIGHT),
                Pos2::new(x, origin.y + height),
            ],
            stroke,
        );
    }
}

fn draw_header(
    painter: &Painter,
    origin: Pos2,
    headers: &[ColumnHeader],
    column_width: f32,
    width: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    for header in headers {
        let x = origin.x + header.position;
        if header.is_current {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(column_width, HEADER_HEIGHT)),
                0.0,
                theme::BG_HEADER_CURRENT,
            );
        }
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
        let label_color = if header.is_current { theme::ACCENT } else { theme::TEXT_PRIMARY };

        if header.days.is_empty() {
            painter.text(
                Pos2::new(x + 6.0, origin.y + 15.0),
                egui::Align2::LEFT_CENTER,
                &header.label,
                theme::font_header(),
                label_color,
            );
            painter.text(
                Pos2::new(x + 6.0, origin.y + 31.0),
                egui::Align2::LEFT_CENTER,
                &header.sublabel,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
            continue;
        }

        // Weeks: label and week number on top, day tiles underneath.
        painter.text(
            Pos2::new(x + 6.0, origin.y + 11.0),
            egui::Align2::LEFT_CENTER,
            &header.label,
            theme::font_header(),
            label_color,
        );
        painter.text(
            Pos2::new(x + column_width - 6.0, origin.y + 11.0),
            egui::Align2::RIGHT_CENTER,
            &header.sublabel,
            theme::font_small(),
            theme::TEXT_SECONDARY,
        );
        draw_day_tiles(painter, Pos2::new(x, origin.y + DAY_TILE_TOP), header, column_width);
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_day_tiles(painter: &Painter, top_left: Pos2, header: &ColumnHeader, column_width: f32) {
    let tile_width = column_width / header.days.len() as f32;
    let tile_height = HEADER_HEIGHT - DAY_TILE_TOP;

    for (i, tile) in header.days.iter().enumerate() {
        let rect = Rect::from_min_size(
            Pos2::new(top_left.x + i as f32 * tile_width, top_left.y),
            Vec2::new(tile_width, tile_height),
        );
        if tile.is_today {
            painter.rect_filled(rect.shrink(2.0), Rounding::same(3.0), theme::BG_SELECTED);
        }
        if i + 1 < header.days.len() {
            painter.line_segment(
                [rect.right_top(), rect.right_bottom()],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );
        }
        let color = if tile.is_today {
            theme::ACCENT
        } else if tile.is_weekend {
            theme::TEXT_DIM
        } else {
            theme::TEXT_SECONDARY
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            tile.day_number.to_string(),
            theme::font_small(),
            color,
        );
    }
    painter.line_segment(
        [
            top_left,
            Pos2::new(top_left.x + column_width, top_left.y),
        ],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(painter: &Painter, origin: Pos2, x: f32, height: f32) {
    let x = origin.x + x;

    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bar(
    painter: &Painter,
    bar: &BarView,
    name: &str,
    bar_rect: Rect,
    is_placed: bool,
    is_selected: bool,
) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let active = bar.is_dragging || bar.is_resizing;

    if !is_placed {
        // Placement preview: translucent with an outline.
        painter.rect_filled(bar_rect, rounding, bar.background.gamma_multiply(0.35));
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, bar.background));
    } else {
        let shadow_offset = if active { Vec2::new(2.0, 4.0) } else { Vec2::new(1.0, 2.0) };
        painter.rect_filled(
            bar_rect.translate(shadow_offset),
            rounding,
            Color32::from_black_alpha(if active { 70 } else { 35 }),
        );

        let fill = if bar.is_dragging {
            bar.background.gamma_multiply(0.85)
        } else {
            bar.background
        };
        painter.rect_filled(bar_rect, rounding, fill);
        let highlight_rect = Rect::from_min_size(
            bar_rect.min,
            Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
        );
        painter.rect_filled(
            highlight_rect,
            Rounding {
                nw: theme::BAR_ROUNDING,
                ne: theme::BAR_ROUNDING,
                sw: 0.0,
                se: 0.0,
            },
            Color32::from_white_alpha(25),
        );
    }

    if is_selected || active {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(name.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect.intersect(painter.clip_rect()));
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(bar_rect.left() + 8.0, text_y), galley, Color32::TRANSPARENT);
    }
}

fn draw_handles(painter: &Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() + 1.5, bar_rect.right() - 5.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

fn draw_delete(painter: &Painter, rect: Rect, hovered: bool) {
    if hovered {
        painter.circle_filled(rect.center(), DELETE_SIZE / 2.0, theme::DANGER);
    }
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        egui_phosphor::regular::X,
        theme::font_small(),
        theme::TEXT_ON_BAR,
    );
}

fn show_bar_tooltip(ui: &Ui, epic: &Epic) {
    let Some((start, end)) = epic.dates() else {
        return;
    };
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("epic-tip", epic.id)),
        |ui| {
            ui.strong(&epic.name);
            ui.label(format!("{} → {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y")));
        },
    );
}
