//! Backend-neutral figure description
//!
//! A [`Figure`] is a grid of [`Panel`]s, each a list of [`Mark`]s in data
//! coordinates. Plot steps build figures; the PNG persister and the
//! interactive viewer each draw them with their own backend.

use crate::color::Rgb;
use crate::data::stats::BoxStats;
use crate::style::Style;

/// Figures are laid out in inches and rasterised at a chosen dpi.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    /// Width and height in inches.
    pub size: (f64, f64),
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` entries.
    pub panels: Vec<Panel>,
    /// Figure-level legend collected from every panel's labelled marks.
    pub figure_legend: bool,
    pub style: Style,
}

impl Figure {
    /// A `rows x cols` grid of blank panels.
    pub fn grid(rows: usize, cols: usize, size: (f64, f64), style: &Style) -> Self {
        Figure {
            title: None,
            size,
            rows,
            cols,
            panels: vec![Panel::default(); rows * cols],
            figure_legend: false,
            style: style.clone(),
        }
    }

    pub fn panel_mut(&mut self, row: usize, col: usize) -> &mut Panel {
        &mut self.panels[row * self.cols + col]
    }

    pub fn panel(&self, row: usize, col: usize) -> &Panel {
        &self.panels[row * self.cols + col]
    }

    /// Pixel size at the given resolution.
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let px = |inches: f64| (inches * dpi as f64).round().max(1.0) as u32;
        (px(self.size.0), px(self.size.1))
    }

    /// Labelled series across all panels, first occurrence of each label.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        let mut entries: Vec<(String, Rgb)> = Vec::new();
        for panel in &self.panels {
            for (label, color) in panel.legend_entries() {
                if !entries.iter().any(|(l, _)| *l == label) {
                    entries.push((label, color));
                }
            }
        }
        entries
    }
}

/// How an axis labels its ticks.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Axis {
    #[default]
    Continuous,
    /// Fixed tick positions with text labels.
    Categorical(Vec<(f64, String)>),
}

/// One subplot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub marks: Vec<Mark>,
    pub legend: bool,
    /// Hide grid and frame, e.g. a heatmap.
    pub frameless: bool,
}

impl Panel {
    /// A panel with nothing drawn on it.
    pub fn is_blank(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.marks
            .iter()
            .filter_map(|m| m.label().map(|l| (l.to_string(), m.color())))
            .collect()
    }

    /// Data bounds over all marks, padded by 5% (or 0.5 for a zero span).
    /// Bar charts keep their zero baseline; cell grids are not padded.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let mut b = Bounds::default();
        for mark in &self.marks {
            mark.extend_bounds(&mut b);
        }
        let pad = |(lo, hi): (f64, f64), frac: f64| {
            if !lo.is_finite() || !hi.is_finite() {
                (0.0, 1.0)
            } else if hi - lo <= f64::EPSILON {
                (lo - 0.5, hi + 0.5)
            } else {
                let d = (hi - lo) * frac;
                (lo - d, hi + d)
            }
        };
        let only_cells = self.marks.iter().all(|m| matches!(m, Mark::Cells { .. }));
        let frac = if only_cells { 0.0 } else { 0.05 };
        let x = pad((b.x0, b.x1), frac);
        let mut y = pad((b.y0, b.y1), frac);
        if b.bars && b.y0 >= 0.0 {
            y.0 = 0.0;
        }
        (x, y)
    }
}

struct Bounds {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    bars: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            x0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y0: f64::INFINITY,
            y1: f64::NEG_INFINITY,
            bars: false,
        }
    }
}

impl Bounds {
    fn add(&mut self, x: f64, y: f64) {
        if x.is_finite() {
            self.x0 = self.x0.min(x);
            self.x1 = self.x1.max(x);
        }
        if y.is_finite() {
            self.y0 = self.y0.min(y);
            self.y1 = self.y1.max(y);
        }
    }
}

/// One histogram bar spanning `[x0, x1]` from zero to `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
}

/// One box-and-whisker glyph centred at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxItem {
    pub position: f64,
    pub width: f64,
    pub label: String,
    pub color: Rgb,
    pub stats: BoxStats,
}

/// A filled rectangle with optional centred text.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: Rgb,
    pub text: Option<String>,
    pub text_color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Bars {
        label: Option<String>,
        color: Rgb,
        bars: Vec<Bar>,
    },
    Boxes {
        items: Vec<BoxItem>,
    },
    Cells {
        cells: Vec<Cell>,
    },
    Points {
        label: Option<String>,
        color: Rgb,
        radius: f64,
        points: Vec<(f64, f64)>,
    },
    Line {
        label: Option<String>,
        color: Rgb,
        width: f64,
        points: Vec<(f64, f64)>,
    },
}

impl Mark {
    pub fn label(&self) -> Option<&str> {
        match self {
            Mark::Bars { label, .. } | Mark::Points { label, .. } | Mark::Line { label, .. } => {
                label.as_deref()
            }
            Mark::Boxes { .. } | Mark::Cells { .. } => None,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Mark::Bars { color, .. } | Mark::Points { color, .. } | Mark::Line { color, .. } => {
                *color
            }
            Mark::Boxes { items } => items.first().map(|i| i.color).unwrap_or(Rgb::BLACK),
            Mark::Cells { cells } => cells.first().map(|c| c.color).unwrap_or(Rgb::BLACK),
        }
    }

    fn extend_bounds(&self, b: &mut Bounds) {
        match self {
            Mark::Bars { bars, .. } => {
                b.bars = true;
                for bar in bars {
                    b.add(bar.x0, 0.0);
                    b.add(bar.x1, bar.height);
                }
            }
            Mark::Boxes { items } => {
                for item in items {
                    let half = item.width / 2.0;
                    b.add(item.position - half, item.stats.lower_whisker);
                    b.add(item.position + half, item.stats.upper_whisker);
                    for &f in &item.stats.fliers {
                        b.add(item.position, f);
                    }
                }
            }
            Mark::Cells { cells } => {
                for c in cells {
                    b.add(c.x0, c.y0);
                    b.add(c.x1, c.y1);
                }
            }
            Mark::Points { points, .. } | Mark::Line { points, .. } => {
                for &(x, y) in points {
                    b.add(x, y);
                }
            }
        }
    }
}
