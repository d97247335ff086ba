use crate::model::{Board, Epic, EpicCommand, EpicPatch};
use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

/// Text input state for the "add epic" row, owned by the app.
#[derive(Debug, Default)]
pub struct AddEpicInput {
    /// Sprint whose name field is open.
    pub sprint: Option<Uuid>,
    pub name: String,
}

impl AddEpicInput {
    /// Close the field. On submit the name is returned as typed, blank or not.
    fn close(&mut self, submitted: bool) -> Option<String> {
        self.sprint = None;
        let name = std::mem::take(&mut self.name);
        submitted.then_some(name)
    }
}

/// Actions that the sidebar can request.
pub enum SidebarAction {
    None,
    Select(Uuid),
    Command(EpicCommand),
}

/// Render the left-side panel: editor for the selected epic, then the epic
/// list grouped by sprint.
pub fn show_epic_sidebar(
    board: &Board,
    selected: Option<Uuid>,
    input: &mut AddEpicInput,
    ui: &mut Ui,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    if let Some(epic) = selected.and_then(|id| board.epic(id)) {
        let sprint_name = board.sprint_of(epic.id).map(|s| s.name.as_str());
        if let Some(command) = show_epic_editor(epic, sprint_name, ui) {
            action = SidebarAction::Command(command);
        }
        ui.add_space(4.0);
        ui.separator();
        ui.add_space(2.0);
    }

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Epics")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", board.epic_count()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for sprint in &board.sprints {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(sprint.name.to_uppercase())
                            .size(9.0)
                            .color(theme::TEXT_DIM)
                            .strong(),
                    );
                    ui.label(
                        RichText::new(format!(
                            "{} → {}",
                            sprint.start_date.format("%m/%d"),
                            sprint.end_date.format("%m/%d")
                        ))
                        .size(9.0)
                        .color(theme::TEXT_DIM),
                    );
                });
                for epic in &sprint.epics {
                    if let Some(id) = show_epic_row(epic, selected == Some(epic.id), ui) {
                        action = SidebarAction::Select(id);
                    }
                    ui.add_space(1.0);
                }
                if let Some(name) = show_add_input(sprint.id, input, ui) {
                    action = SidebarAction::Command(EpicCommand::Create {
                        sprint_id: sprint.id,
                        name,
                    });
                }
                ui.add_space(8.0);
            }
        });

    action
}

fn show_epic_row(epic: &Epic, is_selected: bool, ui: &mut Ui) -> Option<Uuid> {
    let frame = egui::Frame {
        fill: if is_selected { theme::BG_SELECTED } else { theme::BG_PANEL },
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 4.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::NONE,
        shadow: egui::epaint::Shadow::NONE,
    };

    let frame_resp = frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;

            let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
            ui.painter().circle_filled(dot_rect.center(), 3.0, epic.color);

            let name_text = RichText::new(&epic.name).size(12.0).color(if is_selected {
                Color32::WHITE
            } else {
                theme::TEXT_PRIMARY
            });
            ui.add(egui::Label::new(name_text).truncate());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dates = match (epic.is_placed, epic.dates()) {
                    (true, Some((start, end))) => {
                        format!("{} → {}", start.format("%m/%d"), end.format("%m/%d"))
                    }
                    _ => "unplaced".to_string(),
                };
                ui.label(RichText::new(dates).size(10.0).color(theme::TEXT_SECONDARY));
            });
        });
    });

    let row_click = ui.interact(
        frame_resp.response.rect,
        egui::Id::new(("epic-row", epic.id)),
        egui::Sense::click(),
    );
    row_click.clicked().then_some(epic.id)
}

/// "+ Add epic" button that turns into a name field. Returns the name once
/// submitted with Enter.
fn show_add_input(sprint_id: Uuid, input: &mut AddEpicInput, ui: &mut Ui) -> Option<String> {
    if input.sprint != Some(sprint_id) {
        let btn = egui::Button::new(
            RichText::new(format!("{}  Add epic", egui_phosphor::regular::PLUS))
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
        )
        .frame(false);
        if ui.add(btn).clicked() {
            input.sprint = Some(sprint_id);
            input.name.clear();
        }
        return None;
    }

    let edit = ui.add_sized(
        [ui.available_width(), 24.0],
        egui::TextEdit::singleline(&mut input.name).hint_text("Epic name"),
    );
    if !edit.lost_focus() {
        edit.request_focus();
        return None;
    }
    let submitted = ui.input(|i| i.key_pressed(egui::Key::Enter));
    input.close(submitted)
}

/// Inline editor for the selected epic. Changes go out as store commands,
/// never applied to `epic` directly.
fn show_epic_editor(epic: &Epic, sprint_name: Option<&str>, ui: &mut Ui) -> Option<EpicCommand> {
    let mut command = None;

    ui.add_space(6.0);
    ui.label(
        RichText::new("Edit Epic")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        field_label("Name", ui);
        let mut name = epic.name.clone();
        let name_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut name).font(egui::FontId::proportional(12.0)),
        );
        if name_edit.changed() {
            command = Some(update(epic.id, EpicPatch::renamed(name)));
        }

        match epic.dates() {
            Some((mut start, mut end)) => {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        field_label("Start", ui);
                        let resp = ui.add(
                            egui_extras::DatePickerButton::new(&mut start)
                                .id_salt("epic_start"),
                        );
                        if resp.changed() {
                            let patch = if start > end {
                                EpicPatch::dates(start, start)
                            } else {
                                EpicPatch::start(start)
                            };
                            command = Some(update(epic.id, patch));
                        }
                    });

                    ui.add_space(8.0);

                    ui.vertical(|ui| {
                        field_label("End", ui);
                        let resp = ui.add(
                            egui_extras::DatePickerButton::new(&mut end)
                                .id_salt("epic_end"),
                        );
                        if resp.changed() {
                            let patch = if end < start {
                                EpicPatch::dates(end, end)
                            } else {
                                EpicPatch::end(end)
                            };
                            command = Some(update(epic.id, patch));
                        }
                    });
                });
            }
            None => {
                ui.label(
                    RichText::new("Hover the timeline row and click to place")
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                );
            }
        }

        let placement = if epic.is_placed { "Placed" } else { "Not placed" };
        let info = match sprint_name {
            Some(name) => format!("{placement} · {name}"),
            None => placement.to_string(),
        };
        ui.label(RichText::new(info).size(10.0).color(theme::TEXT_DIM));

        ui.add_space(2.0);
        let delete = egui::Button::new(
            RichText::new(format!("{}  Delete epic", egui_phosphor::regular::X))
                .color(Color32::WHITE)
                .size(12.0),
        )
        .fill(theme::DANGER)
        .rounding(egui::Rounding::same(5.0));
        if ui.add_sized([ui.available_width(), 26.0], delete).clicked() {
            command = Some(EpicCommand::Delete { epic_id: epic.id });
        }
    });

    command
}

fn field_label(text: &str, ui: &mut Ui) {
    ui.label(
        RichText::new(text)
            .size(10.0)
            .color(theme::TEXT_DIM)
            .strong(),
    );
}

fn update(epic_id: Uuid, patch: EpicPatch) -> EpicCommand {
    EpicCommand::Update { epic_id, patch }
}
