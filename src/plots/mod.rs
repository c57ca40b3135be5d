//! The plot catalogue: a fixed, ordered registry of plot steps.
//!
//! ```text
//!   Table ──┬─ corners_hist ─┐
//!           ├─ boxplots ─────┤
//!           ├─ hists ────────┼──► Catalogue (PlotName → Figure)
//!           ├─ heatmap ──────┤
//!           └─ map ──────────┘
//! ```

use std::fmt;

use crate::data::model::Table;
use crate::error::{BuildError, ShapeError};
use crate::figure::Figure;
use crate::style::Style;

pub mod boxplots;
pub mod corners_hist;
pub mod heatmap;
pub mod hists;
pub mod pair_grid;

/// Catalogue keys; also the output filename stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlotName {
    CornersHist,
    Boxplots,
    Hists,
    Heatmap,
    Map,
}

impl PlotName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotName::CornersHist => "corners_hist",
            PlotName::Boxplots => "boxplots",
            PlotName::Hists => "hists",
            PlotName::Heatmap => "heatmap",
            PlotName::Map => "map",
        }
    }
}

impl fmt::Display for PlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plot step: pure function of the table and the style.
pub type PlotFn = fn(&Table, &Style) -> Result<Figure, ShapeError>;

/// Build order of the catalogue.
pub const REGISTRY: [(PlotName, PlotFn); 5] = [
    (PlotName::CornersHist, corners_hist::build),
    (PlotName::Boxplots, boxplots::build),
    (PlotName::Hists, hists::build),
    (PlotName::Heatmap, heatmap::build),
    (PlotName::Map, pair_grid::build),
];

/// Named figures in registry order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalogue {
    entries: Vec<(PlotName, Figure)>,
}

impl Catalogue {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: PlotName) -> Option<&Figure> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, fig)| fig)
    }

    pub fn names(&self) -> Vec<PlotName> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlotName, &Figure)> {
        self.entries.iter().map(|(n, fig)| (*n, fig))
    }
}

/// Run every registered plot step once. The first failing step aborts the
/// build.
pub fn build_all(table: &Table, style: &Style) -> Result<Catalogue, BuildError> {
    let mut entries = Vec::with_capacity(REGISTRY.len());
    for (name, build) in REGISTRY {
        log::debug!("Building {name}");
        let figure = build(table, style).map_err(|source| BuildError { plot: name, source })?;
        entries.push((name, figure));
    }
    log::info!(
        "Built {} figures from {} rows x {} columns",
        entries.len(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(Catalogue { entries })
}

/// Numeric slices of a group of columns.
pub(crate) fn numeric_columns<'a>(
    columns: &'a [crate::data::model::Column],
) -> Result<Vec<&'a [f64]>, ShapeError> {
    columns.iter().map(|c| c.numeric()).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::model::{Column, ColumnData, Table};

    /// `rb_corners`, `gt_corners` and nine filler columns.
    pub fn corners_table() -> Table {
        let mut columns = vec![
            Column {
                name: "rb_corners".into(),
                data: ColumnData::Numeric(vec![1.0, 2.0, 2.0, 3.0]),
            },
            Column {
                name: "gt_corners".into(),
                data: ColumnData::Numeric(vec![2.0, 2.0, 3.0, 3.0]),
            },
        ];
        for i in 0..9 {
            let k = i as f64;
            columns.push(Column {
                name: format!("stat_{i}"),
                data: ColumnData::Numeric(vec![
                    10.0 + k,
                    25.0 + 3.0 * k,
                    14.0 + k * k,
                    60.0 - 2.0 * k,
                ]),
            });
        }
        Table::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::corners_table;
    use super::*;
    use crate::data::loader::parse_json;

    #[test]
    fn test_build_all_returns_every_plot_in_order() {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        assert_eq!(catalogue.len(), 5);
        assert_eq!(
            catalogue.names(),
            REGISTRY.iter().map(|(n, _)| *n).collect::<Vec<_>>()
        );
        let names: Vec<&str> = catalogue.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["corners_hist", "boxplots", "hists", "heatmap", "map"]);
    }

    #[test]
    fn test_build_all_twice_is_independent() {
        let table = corners_table();
        let first = build_all(&table, &Style::from_theme(crate::style::Theme::White)).unwrap();
        let second = build_all(&table, &Style::default()).unwrap();
        let again = build_all(&table, &Style::default()).unwrap();
        assert_eq!(second, again);
        assert_ne!(first, second);
        let heatmap = second.get(PlotName::Heatmap).unwrap();
        assert_eq!(heatmap.style, Style::default());
    }

    #[test]
    fn test_missing_columns_fail_at_build_not_import() {
        let table = parse_json(r#"[{"id": "a", "x": 1, "y": 2}]"#).unwrap();
        let err = build_all(&table, &Style::default()).unwrap_err();
        assert_eq!(err.plot, PlotName::CornersHist);
        assert_eq!(
            err.source,
            ShapeError::MissingColumn {
                name: "rb_corners".into()
            }
        );
    }

    #[test]
    fn test_narrow_table_fails_whole_build() {
        let table = parse_json(r#"[{"rb_corners": 1, "gt_corners": 2, "a": 3, "b": 4}]"#).unwrap();
        let err = build_all(&table, &Style::default()).unwrap_err();
        assert_eq!(err.plot, PlotName::Boxplots);
        assert!(matches!(err.source, ShapeError::EmptySlice { start: 6, .. }));
    }
}
