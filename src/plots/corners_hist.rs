use crate::color::Rgb;
use crate::data::model::Table;
use crate::data::stats::{equal_width_edges, value_range, Histogram};
use crate::error::ShapeError;
use crate::figure::{Bar, Figure, Mark};
use crate::style::Style;

const COLUMNS: [&str; 2] = ["rb_corners", "gt_corners"];
const COLORS: [Rgb; 2] = [Rgb::RED, Rgb::BLUE];
const BINS: usize = 4;
/// Share of each bin covered by the grouped bars.
const GROUP_WIDTH: f64 = 0.8;

/// Detected vs. ground-truth corner counts, grouped side by side per bin.
pub fn build(table: &Table, style: &Style) -> Result<Figure, ShapeError> {
    let series = COLUMNS
        .iter()
        .map(|name| table.column(name)?.numeric())
        .collect::<Result<Vec<_>, _>>()?;

    let joint: Vec<f64> = series.iter().flat_map(|s| s.iter().copied()).collect();
    let (lo, hi) = value_range(&joint).unwrap_or((0.0, 1.0));
    let edges = equal_width_edges(BINS, lo, hi);

    let mut fig = Figure::grid(1, 1, (6.4, 4.8), style);
    fig.figure_legend = true;

    let panel = fig.panel_mut(0, 0);
    panel.x_label = Some("corners".into());
    panel.y_label = Some("count".into());

    let n = series.len() as f64;
    for (k, (values, (name, color))) in series
        .iter()
        .zip(COLUMNS.iter().zip(COLORS))
        .enumerate()
    {
        let hist = Histogram::with_edges(values, &edges);
        let bars = hist
            .edges
            .windows(2)
            .zip(&hist.counts)
            .map(|(e, &height)| {
                let w = (e[1] - e[0]) * GROUP_WIDTH / n;
                let x0 = e[0] + (e[1] - e[0]) * (1.0 - GROUP_WIDTH) / 2.0 + k as f64 * w;
                Bar {
                    x0,
                    x1: x0 + w,
                    height,
                }
            })
            .collect();
        panel.marks.push(Mark::Bars {
            label: Some(name.to_string()),
            color,
            bars,
        });
    }

    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures::corners_table;

    #[test]
    fn test_corners_hist_groups_two_series() {
        let fig = build(&corners_table(), &Style::default()).unwrap();
        assert!(fig.figure_legend);
        let panel = fig.panel(0, 0);
        assert_eq!(panel.marks.len(), 2);

        let Mark::Bars { bars: rb, .. } = &panel.marks[0] else {
            panic!("expected bars");
        };
        let Mark::Bars { bars: gt, .. } = &panel.marks[1] else {
            panic!("expected bars");
        };
        assert_eq!(rb.len(), BINS);
        // rb = [1, 2, 2, 3], gt = [2, 2, 3, 3] over edges 1, 1.5, 2, 2.5, 3
        let heights = |bars: &[Bar]| bars.iter().map(|b| b.height).collect::<Vec<_>>();
        assert_eq!(heights(rb), vec![1.0, 0.0, 2.0, 1.0]);
        assert_eq!(heights(gt), vec![0.0, 0.0, 2.0, 2.0]);
        assert!(rb[0].x1 <= gt[0].x0 + 1e-12);

        let labels: Vec<String> = fig.legend_entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["rb_corners", "gt_corners"]);
    }
}
