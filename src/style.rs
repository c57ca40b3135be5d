//! Figure styling passed explicitly into every plot step.

use clap::ValueEnum;

use crate::color::{ColorMap, Rgb, DEEP};

/// Named theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    /// Grey panel with white grid lines
    #[default]
    Darkgrid,
    /// White panel with grey grid lines
    Whitegrid,
    /// Grey panel, no grid
    Dark,
    /// White panel, no grid
    White,
}

/// Colours, fonts and resolution for one catalogue build.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub theme: Theme,
    pub figure_background: Rgb,
    pub panel_background: Rgb,
    pub grid: Option<Rgb>,
    pub text: Rgb,
    /// Qualitative cycle for overlaid series.
    pub palette: Vec<Rgb>,
    /// Sequential map for the correlation heatmap.
    pub heatmap: ColorMap,
    /// Sequential map for filled densities.
    pub density: ColorMap,
    pub font_family: String,
    /// Base font size in points.
    pub font_size: f64,
    /// Alpha of overlaid histogram bars.
    pub overlay_alpha: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style::from_theme(Theme::default())
    }
}

impl Style {
    pub fn from_theme(theme: Theme) -> Self {
        let (panel_background, grid) = match theme {
            Theme::Darkgrid => (Rgb::hex(0xeaeaf2), Some(Rgb::WHITE)),
            Theme::Whitegrid => (Rgb::WHITE, Some(Rgb::hex(0xcccccc))),
            Theme::Dark => (Rgb::hex(0xeaeaf2), None),
            Theme::White => (Rgb::WHITE, None),
        };
        Style {
            theme,
            figure_background: Rgb::WHITE,
            panel_background,
            grid,
            text: Rgb::hex(0x262626),
            palette: DEEP.to_vec(),
            heatmap: ColorMap::rocket(),
            density: ColorMap::blues(),
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            overlay_alpha: 0.4,
        }
    }

    /// The `i`-th colour of the qualitative cycle.
    pub fn series_color(&self, i: usize) -> Rgb {
        if self.palette.is_empty() {
            return Rgb::BLACK;
        }
        self.palette[i % self.palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_presets() {
        assert_eq!(Style::default().theme, Theme::Darkgrid);
        assert!(Style::from_theme(Theme::White).grid.is_none());
        assert_eq!(Style::from_theme(Theme::Whitegrid).panel_background, Rgb::WHITE);
    }

    #[test]
    fn test_series_color_cycles() {
        let style = Style::default();
        assert_eq!(style.series_color(0), style.series_color(style.palette.len()));
    }
}
