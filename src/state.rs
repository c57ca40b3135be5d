use std::path::Path;

use crate::export::{save_all, ExportConfig};
use crate::figure::Figure;
use crate::plots::{Catalogue, PlotName};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Figures to show; fixed for the lifetime of the window.
    pub catalogue: Catalogue,

    /// Index of the figure on screen.
    pub selected: usize,

    /// Resolution used by "Save all…".
    pub export_config: ExportConfig,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(catalogue: Catalogue, export_config: ExportConfig) -> Self {
        Self {
            catalogue,
            selected: 0,
            export_config,
            status_message: None,
        }
    }

    /// Name and figure currently on screen.
    pub fn selected_figure(&self) -> Option<(PlotName, &Figure)> {
        self.catalogue.iter().nth(self.selected)
    }

    pub fn select(&mut self, name: PlotName) {
        if let Some(i) = self.catalogue.names().iter().position(|n| *n == name) {
            self.selected = i;
        }
    }

    pub fn select_next(&mut self) {
        if !self.catalogue.is_empty() {
            self.selected = (self.selected + 1) % self.catalogue.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.catalogue.is_empty() {
            self.selected = (self.selected + self.catalogue.len() - 1) % self.catalogue.len();
        }
    }

    /// Write every figure into `dir`, reporting the outcome in the status line.
    pub fn save_all_to(&mut self, dir: &Path) {
        match save_all(&self.catalogue, dir, &self.export_config) {
            Ok(written) => {
                self.status_message = Some(format!(
                    "Saved {} figures to {}",
                    written.len(),
                    dir.display()
                ));
            }
            Err(e) => {
                log::error!("Failed to save figures: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::{build_all, fixtures::corners_table};
    use crate::style::Style;

    fn state() -> AppState {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        AppState::new(catalogue, ExportConfig { dpi: 20 })
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = state();
        assert_eq!(state.selected_figure().map(|(n, _)| n), Some(PlotName::CornersHist));
        state.select_previous();
        assert_eq!(state.selected_figure().map(|(n, _)| n), Some(PlotName::Map));
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_figure().map(|(n, _)| n), Some(PlotName::Boxplots));
        state.select(PlotName::Heatmap);
        assert_eq!(state.selected, 3);
    }

    #[test]
    fn test_save_all_reports_status() {
        let mut state = state();
        let dir = tempfile::tempdir().unwrap();
        state.save_all_to(&dir.path().join("missing"));
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error")));

        state.save_all_to(dir.path());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Saved 5 figures")));
    }
}
