use crate::color::qualitative;
use crate::data::model::Table;
use crate::data::stats::BoxStats;
use crate::error::ShapeError;
use crate::figure::{Axis, BoxItem, Figure, Mark};
use crate::style::Style;

/// Column groups, one panel each: `3..6`, `6..9`, `9..`.
const GROUPS: [(usize, usize); 3] = [(3, 6), (6, 9), (9, usize::MAX)];
const BOX_WIDTH: f64 = 0.8;

/// Box-and-whisker panels for the three statistic groups, side by side.
pub fn build(table: &Table, style: &Style) -> Result<Figure, ShapeError> {
    let mut fig = Figure::grid(1, GROUPS.len(), (12.0, 9.0), style);

    for (col, &(start, end)) in GROUPS.iter().enumerate() {
        let columns = table.columns_range(start, end)?;
        // The open-ended group can outgrow the fixed cycle
        let colors = qualitative(&style.palette, columns.len());
        let mut items = Vec::with_capacity(columns.len());
        let mut ticks = Vec::with_capacity(columns.len());

        for (i, column) in columns.iter().enumerate() {
            let position = i as f64;
            ticks.push((position, column.name.clone()));
            // An all-missing column keeps its slot but draws nothing.
            let Some(stats) = BoxStats::from_data(column.numeric()?) else {
                continue;
            };
            items.push(BoxItem {
                position,
                width: BOX_WIDTH,
                label: column.name.clone(),
                color: colors[i],
                stats,
            });
        }

        let panel = fig.panel_mut(0, col);
        panel.x_axis = Axis::Categorical(ticks);
        panel.marks.push(Mark::Boxes { items });
    }

    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};
    use crate::plots::fixtures::corners_table;

    #[test]
    fn test_boxplots_cover_column_groups() {
        let fig = build(&corners_table(), &Style::default()).unwrap();
        assert_eq!((fig.rows, fig.cols), (1, 3));
        let counts: Vec<usize> = fig
            .panels
            .iter()
            .map(|p| match &p.marks[0] {
                Mark::Boxes { items } => items.len(),
                _ => 0,
            })
            .collect();
        // 11 columns: 3..6, 6..9, 9..11
        assert_eq!(counts, vec![3, 3, 2]);
        let Axis::Categorical(ticks) = &fig.panel(0, 0).x_axis else {
            panic!("expected categorical axis");
        };
        assert_eq!(ticks[0].1, "stat_1");
    }

    #[test]
    fn test_wide_group_gets_distinct_colors() {
        let columns = (0..21)
            .map(|i| Column {
                name: format!("c{i}"),
                data: ColumnData::Numeric(vec![i as f64, 2.0 * i as f64 + 1.0, 5.0]),
            })
            .collect();
        let fig = build(&Table::new(columns), &Style::default()).unwrap();

        let Mark::Boxes { items } = &fig.panel(0, 2).marks[0] else {
            panic!("expected boxes");
        };
        assert_eq!(items.len(), 12);
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                assert_ne!(a.color, b.color, "{} and {}", a.label, b.label);
            }
        }
    }
}
