use crate::data::model::Table;
use crate::data::stats::{stepped_edges, Histogram};
use crate::error::ShapeError;
use crate::figure::{Bar, Figure, Mark};
use crate::style::Style;

const PANELS: usize = 3;
/// Parallel column groups; the `i`-th column of each is overlaid in panel `i`.
const GROUP_STARTS: [usize; 3] = [3, 6, 9];

/// Overlaid histograms of matching statistics across the column groups.
/// Panels beyond the number of complete triples stay blank.
pub fn build(table: &Table, style: &Style) -> Result<Figure, ShapeError> {
    let groups = GROUP_STARTS
        .iter()
        .map(|&start| table.columns_from(start))
        .collect::<Result<Vec<_>, _>>()?;
    let n_triples = groups.iter().map(|g| g.len()).min().unwrap_or(0);
    let edges = stepped_edges(1.0, 200.0, 10.0);

    let mut fig = Figure::grid(1, PANELS, (12.0, 8.0), style);

    for i in 0..n_triples.min(PANELS) {
        let panel = fig.panel_mut(0, i);
        panel.legend = true;
        for (k, group) in groups.iter().enumerate() {
            let column = &group[i];
            let hist = Histogram::with_edges(column.numeric()?, &edges);
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
                label: Some(column.name.clone()),
                color: style.series_color(k).with_alpha(style.overlay_alpha),
                bars,
            });
        }
    }

    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures::corners_table;

    #[test]
    fn test_hists_zip_column_groups() {
        let fig = build(&corners_table(), &Style::default()).unwrap();
        assert_eq!(fig.panels.len(), PANELS);
        // 11 columns give two complete triples
        let labels: Vec<String> = fig
            .panel(0, 0)
            .legend_entries()
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels, vec!["stat_1", "stat_4", "stat_7"]);
        assert!(!fig.panel(0, 1).is_blank());
        assert!(fig.panel(0, 2).is_blank());

        let Mark::Bars { bars, .. } = &fig.panel(0, 0).marks[0] else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), 19);
        assert_eq!(bars[0].x0, 1.0);
        assert_eq!(bars[18].x1, 191.0);
    }
}
