use crate::timeline::Granularity;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// What the controls bar asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsAction {
    None,
    Today,
    SetGranularity(Granularity),
}

/// Top bar: "Today" plus one toggle per zoom level.
pub fn show_controls(current: Granularity, title: &str, ui: &mut Ui) -> ControlsAction {
    let mut action = ControlsAction::None;

    menu::bar(ui, |ui| {
        let today_btn = egui::Button::new(
            RichText::new(format!("{}  Today", egui_phosphor::regular::CALENDAR))
                .font(theme::font_header()),
        );
        if ui.add(today_btn).on_hover_text("Scroll to today").clicked() {
            action = ControlsAction::Today;
        }

        ui.separator();

        for granularity in Granularity::ALL {
            let selected = granularity == current;
            if ui
                .selectable_label(selected, RichText::new(granularity.label()).font(theme::font_header()))
                .clicked()
                && !selected
            {
                action = ControlsAction::SetGranularity(granularity);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(title).size(11.0).weak());
        });
    });

    action
}
