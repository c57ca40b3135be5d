use anyhow::anyhow;
use eframe::egui;

use crate::export::ExportConfig;
use crate::plots::Catalogue;
use crate::state::AppState;
use crate::ui::{panels, plot};

/// Window settings for the interactive viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub width: f32,
    pub height: f32,
    /// Resolution used by the viewer's "Save all…" action.
    pub export: ExportConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 900.0,
            export: ExportConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ViewerApp {
    pub state: AppState,
}

impl ViewerApp {
    pub fn new(catalogue: Catalogue, export: ExportConfig) -> Self {
        Self {
            state: AppState::new(catalogue, export),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Keyboard: cycle through figures ----
        let (next, previous) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowLeft),
            )
        });
        if next {
            self.state.select_next();
        }
        if previous {
            self.state.select_previous();
        }

        // ---- Top panel: menu bar and figure tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: figure list ----
        egui::SidePanel::left("figure_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: figure grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_view(ui, &self.state);
        });
    }
}

/// Show the catalogue in a native window; returns once the window closes.
pub fn present(catalogue: Catalogue, config: &ViewerConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };
    let export = config.export.clone();

    log::info!("Opening viewer with {} figures", catalogue.len());
    eframe::run_native(
        "Corner Plots",
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(catalogue, export)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
