use crate::data::model::Table;
use crate::data::stats::{finite, kde_1d, kde_2d, Histogram};
use crate::error::ShapeError;
use crate::figure::{Bar, Cell, Figure, Mark, Panel};
use crate::plots::numeric_columns;
use crate::style::Style;

const FIRST_COLUMN: usize = 3;
/// Inches per variable.
const CELL_SIZE: f64 = 2.5;
const KDE_POINTS: usize = 200;
const DENSITY_GRID: usize = 40;
const DENSITY_LEVELS: usize = 10;
/// Densities below this share of the peak are not filled.
const DENSITY_THRESHOLD: f64 = 0.05;

/// Pairwise relationship grid: scatter above the diagonal, filled bivariate
/// densities below it, histogram plus density curve on it.
pub fn build(table: &Table, style: &Style) -> Result<Figure, ShapeError> {
    let columns = table.columns_from(FIRST_COLUMN)?;
    let values = numeric_columns(columns)?;
    let n = columns.len();
    let size = CELL_SIZE * n as f64;

    let mut fig = Figure::grid(n, n, (size, size), style);

    for row in 0..n {
        for col in 0..n {
            let panel = fig.panel_mut(row, col);
            if row == n - 1 {
                panel.x_label = Some(columns[col].name.clone());
            }
            if col == 0 {
                panel.y_label = Some(columns[row].name.clone());
            }

            let (x, y) = (values[col], values[row]);
            if row < col {
                scatter(panel, x, y, style);
            } else if row > col {
                if !filled_density(panel, x, y, style) {
                    log::warn!(
                        "Skipping density of {} vs {}: singular covariance",
                        columns[row].name,
                        columns[col].name
                    );
                }
            } else {
                diagonal(panel, x, style);
            }
        }
    }

    Ok(fig)
}

fn scatter(panel: &mut Panel, x: &[f64], y: &[f64], style: &Style) {
    let points = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    panel.marks.push(Mark::Points {
        label: None,
        color: style.series_color(0),
        radius: 2.5,
        points,
    });
}

/// Returns `false` when the density could not be estimated.
fn filled_density(panel: &mut Panel, x: &[f64], y: &[f64], style: &Style) -> bool {
    let Some(grid) = kde_2d(x, y, DENSITY_GRID) else {
        return false;
    };
    let peak = grid.max();
    if peak <= 0.0 {
        return false;
    }
    let half_step = |axis: &[f64]| match axis {
        [a, b, ..] => (b - a) / 2.0,
        _ => 0.5,
    };
    let (hx, hy) = (half_step(&grid.xs), half_step(&grid.ys));

    let mut cells = Vec::new();
    for (iy, row) in grid.values.iter().enumerate() {
        for (ix, &density) in row.iter().enumerate() {
            let share = density / peak;
            if share < DENSITY_THRESHOLD {
                continue;
            }
            // Quantised into discrete bands like filled contours
            let level = (share * DENSITY_LEVELS as f64).ceil() / DENSITY_LEVELS as f64;
            let (cx, cy) = (grid.xs[ix], grid.ys[iy]);
            cells.push(Cell {
                x0: cx - hx,
                y0: cy - hy,
                x1: cx + hx,
                y1: cy + hy,
                color: style.density.at(level),
                text: None,
                text_color: style.text,
            });
        }
    }
    panel.marks.push(Mark::Cells { cells });
    true
}

fn diagonal(panel: &mut Panel, x: &[f64], style: &Style) {
    let hist = Histogram::auto(x);
    let color = style.series_color(0);
    let bars = hist
        .edges
        .windows(2)
        .zip(&hist.counts)
        .map(|(e, &height)| Bar {
            x0: e[0],
            x1: e[1],
            height,
        })
        .collect();
    panel.marks.push(Mark::Bars {
        label: None,
        color: color.with_alpha(0.6),
        bars,
    });

    // Density scaled to histogram counts
    let scale = finite(x).len() as f64 * hist.bin_width();
    let curve: Vec<(f64, f64)> = kde_1d(x, KDE_POINTS)
        .into_iter()
        .map(|(gx, d)| (gx, d * scale))
        .collect();
    if !curve.is_empty() {
        panel.marks.push(Mark::Line {
            label: None,
            color,
            width: 1.5,
            points: curve,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures::corners_table;

    #[test]
    fn test_pair_grid_layout() {
        let table = corners_table();
        let fig = build(&table, &Style::default()).unwrap();
        let n = table.n_columns() - FIRST_COLUMN;
        assert_eq!((fig.rows, fig.cols), (n, n));
        assert_eq!(fig.size, (2.5 * n as f64, 2.5 * n as f64));

        assert!(matches!(fig.panel(0, 1).marks[0], Mark::Points { .. }));
        assert!(matches!(fig.panel(0, 0).marks[0], Mark::Bars { .. }));
        assert!(matches!(fig.panel(0, 0).marks[1], Mark::Line { .. }));
        assert_eq!(fig.panel(n - 1, 0).x_label.as_deref(), Some("stat_1"));
        assert_eq!(fig.panel(2, 0).y_label.as_deref(), Some("stat_3"));
        assert!(fig.panel(0, 1).x_label.is_none());
    }

    #[test]
    fn test_lower_triangle_is_filled_density() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64).collect();
        let mut panel = Panel::default();
        assert!(filled_density(&mut panel, &x, &y, &Style::default()));
        let Mark::Cells { cells } = &panel.marks[0] else {
            panic!("expected cells");
        };
        assert!(!cells.is_empty());
        assert!(cells.len() < DENSITY_GRID * DENSITY_GRID);

        let mut panel = Panel::default();
        assert!(!filled_density(&mut panel, &x, &x, &Style::default()));
        assert!(panel.is_blank());
    }
}
