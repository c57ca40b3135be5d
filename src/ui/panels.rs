use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – figure list
// ---------------------------------------------------------------------------

/// Render the left panel listing every figure in the catalogue.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Figures");
    ui.separator();

    let names = state.catalogue.names();
    for (i, name) in names.iter().enumerate() {
        if ui
            .selectable_label(state.selected == i, name.as_str())
            .clicked()
        {
            state.select(*name);
        }
    }

    ui.separator();

    if let Some((_, figure)) = state.selected_figure() {
        let (w, h) = figure.pixel_size(state.export_config.dpi);
        ui.label(format!(
            "{} x {} panels, {w} x {h} px at {} dpi",
            figure.rows, figure.cols, state.export_config.dpi
        ));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save all…").clicked() {
                save_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        let names = state.catalogue.names();
        for (i, name) in names.iter().enumerate() {
            if ui
                .selectable_label(state.selected == i, name.as_str())
                .clicked()
            {
                state.select(*name);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn save_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Save all figures as PNG")
        .pick_folder();

    if let Some(dir) = folder {
        state.save_all_to(&dir);
    }
}
