use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TimelineSettings;
use crate::model::defaults::{PaletteDefaults, EPIC_PALETTE};
use crate::model::{Board, Epic, EpicCommand, EpicStore, Sprint};
use crate::timeline::calendar::{add_months, month_start, sub_months};
use crate::timeline::{Granularity, TimelineView};
use crate::ui;
use crate::ui::controls::ControlsAction;
use crate::ui::epic_sidebar::{AddEpicInput, SidebarAction};

/// Main application state.
pub struct TimelineApp {
    pub board: Board,
    pub view: TimelineView,
    pub settings: TimelineSettings,
    pub settings_path: PathBuf,
    pub selected_epic: Option<Uuid>,
    pub add_input: AddEpicInput,

    // Status message
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: TimelineSettings,
        settings_path: PathBuf,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let board = Self::sample_board(&settings, today);
        info!(epics = board.epic_count(), "sample board loaded");

        Self::with_board(board, settings, settings_path, today)
    }

    fn with_board(
        board: Board,
        settings: TimelineSettings,
        settings_path: PathBuf,
        today: NaiveDate,
    ) -> Self {
        Self {
            board,
            view: TimelineView::new(&settings, today),
            settings,
            settings_path,
            selected_epic: None,
            add_input: AddEpicInput::default(),
            status_message: "Ready".to_string(),
        }
    }

    /// One sprint in the current month with two epics straddling it.
    fn sample_board(settings: &TimelineSettings, today: NaiveDate) -> Board {
        let mut board = Board::new(Box::new(PaletteDefaults::new(settings.default_duration_days)));
        let first = month_start(today);
        let fifteenth = |date: NaiveDate| date.with_day(15).unwrap_or(date);
        let emerald = EPIC_PALETTE[1];

        let mut sprint = Sprint::new("Current Sprint", first, first.with_day(14).unwrap_or(first));
        sprint.epics.push(Epic::placed(
            "Current Feature",
            fifteenth(sub_months(first, 1)),
            fifteenth(add_months(first, 1)),
            emerald,
        ));
        sprint.epics.push(Epic::placed(
            "Current Feature 2",
            fifteenth(first),
            fifteenth(add_months(first, 2)),
            emerald,
        ));
        board.add_sprint(sprint);
        board
    }

    fn now(ctx: &egui::Context) -> f64 {
        ctx.input(|i| i.time)
    }

    // --- Epic operations ---

    /// Route a command to the store. Rejected commands are only logged; the
    /// status line keeps its last message.
    pub fn apply_command(&mut self, command: EpicCommand) {
        let deleted = match &command {
            EpicCommand::Delete { epic_id } => Some(*epic_id),
            _ => None,
        };
        let created = matches!(command, EpicCommand::Create { .. });

        match self.board.apply(command) {
            Ok(()) => {
                if let Some(id) = deleted {
                    if self.selected_epic == Some(id) {
                        self.selected_epic = None;
                    }
                    self.status_message = "Epic deleted".to_string();
                } else if created {
                    self.status_message = "Epic added. Hover its row to place it".to_string();
                }
            }
            Err(e) => warn!("epic command rejected: {e}"),
        }
    }

    pub fn create_epic_at(&mut self, date: NaiveDate) {
        let Some(sprint_id) = self.board.sprints.last().map(|s| s.id) else {
            self.status_message = "No sprint to add the epic to".to_string();
            return;
        };
        match self.board.create_placed_epic(sprint_id, "New Epic", date) {
            Ok(id) => {
                self.selected_epic = Some(id);
                self.status_message = format!("Epic added on {}", date.format("%Y-%m-%d"));
            }
            Err(e) => warn!("could not create epic: {e}"),
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity, now: f64) {
        if granularity == self.view.granularity() {
            return;
        }
        self.view.set_granularity(granularity, now);
        self.settings.default_granularity = granularity;
        if let Err(e) = self.settings.save_to(&self.settings_path) {
            warn!(path = %self.settings_path.display(), "could not save settings: {e}");
        }
        self.status_message = format!("Zoom: {}", granularity.label());
    }

    fn report_gesture_end(&mut self, epic_id: Uuid) {
        let Some(epic) = self.board.epic(epic_id) else {
            return;
        };
        if let Some((start, end)) = epic.dates() {
            self.status_message = format!(
                "Updated '{}' ({} → {})",
                epic.name,
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            );
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);
        let today = chrono::Local::now().date_naive();

        // Top panel: controls
        let mut controls = ControlsAction::None;
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            controls = ui::controls::show_controls(self.view.granularity(), "Timeline", ui);
        });
        match controls {
            ControlsAction::Today => {
                self.view.scroll_to_today(Self::now(ctx));
                self.status_message = "Scrolled to today".to_string();
            }
            ControlsAction::SetGranularity(g) => self.set_granularity(g, Self::now(ctx)),
            ControlsAction::None => {}
        }

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Epics: {}", self.board.epic_count()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("Zoom: {}", self.view.granularity().label()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: epic list + editor
        let mut sidebar = SidebarAction::None;
        egui::SidePanel::left("epic_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(200.0)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                sidebar = ui::epic_sidebar::show_epic_sidebar(
                    &self.board,
                    self.selected_epic,
                    &mut self.add_input,
                    ui,
                );
            });
        match sidebar {
            SidebarAction::Select(id) => self.selected_epic = Some(id),
            SidebarAction::Command(command) => self.apply_command(command),
            SidebarAction::None => {}
        }

        // Central panel: timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut canvas = ui::timeline_canvas::CanvasInteraction::default();
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            canvas = ui::timeline_canvas::show_timeline_canvas(
                &self.board,
                &mut self.view,
                self.selected_epic,
                today,
                ui,
            );
        });

        for command in canvas.commands {
            self.apply_command(command);
        }
        if let Some(id) = canvas.select {
            self.selected_epic = Some(id);
        } else if canvas.clear_selection {
            self.selected_epic = None;
        }
        if let Some(date) = canvas.create_at {
            self.create_epic_at(date);
        }
        if let Some(session) = canvas.finished {
            self.report_gesture_end(session.epic_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EpicPatch;

    fn app() -> TimelineApp {
        let settings = TimelineSettings::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let board = TimelineApp::sample_board(&settings, today);
        TimelineApp::with_board(board, settings, PathBuf::from("unused.json"), today)
    }

    #[test]
    fn rejected_command_keeps_status_line() {
        let mut app = app();
        app.status_message = "Scrolled to today".to_string();

        let epic = app.board.epics().next().unwrap().clone();
        let (start, end) = epic.dates().unwrap();
        app.apply_command(EpicCommand::Update {
            epic_id: epic.id,
            patch: EpicPatch::dates(end, start),
        });
        app.apply_command(EpicCommand::Delete { epic_id: Uuid::new_v4() });

        assert_eq!(app.status_message, "Scrolled to today");
        assert_eq!(app.board.epic(epic.id).unwrap().dates(), Some((start, end)));
        assert_eq!(app.board.epic_count(), 2);
    }

    #[test]
    fn deleting_the_selected_epic_clears_selection() {
        let mut app = app();
        let id = app.board.epics().next().unwrap().id;
        app.selected_epic = Some(id);
        app.apply_command(EpicCommand::Delete { epic_id: id });
        assert_eq!(app.selected_epic, None);
        assert_eq!(app.status_message, "Epic deleted");
    }
}
