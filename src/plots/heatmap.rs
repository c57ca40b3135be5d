use crate::color::Rgb;
use crate::data::model::Table;
use crate::data::stats::{correlation_matrix, value_range};
use crate::error::ShapeError;
use crate::figure::{Axis, Cell, Figure, Mark};
use crate::plots::numeric_columns;
use crate::style::Style;

/// First column position included; position 0 is the identifier.
const FIRST_COLUMN: usize = 1;
const DECIMALS: i32 = 3;
/// Cells darker than this get white annotations.
const DARK_LUMINANCE: f64 = 0.408;

/// Column names and the rounded correlation matrix the heatmap shows.
pub fn correlation(table: &Table) -> Result<(Vec<String>, Vec<Vec<f64>>), ShapeError> {
    let columns = table.columns_from(FIRST_COLUMN)?;
    let names = columns.iter().map(|c| c.name.clone()).collect();
    let values = numeric_columns(columns)?;
    Ok((names, correlation_matrix(&values, DECIMALS)))
}

/// Annotated correlation heatmap, first row at the top.
pub fn build(table: &Table, style: &Style) -> Result<Figure, ShapeError> {
    let (names, matrix) = correlation(table)?;
    let n = names.len();
    let flat: Vec<f64> = matrix.iter().flatten().copied().collect();
    let (lo, hi) = value_range(&flat).unwrap_or((-1.0, 1.0));

    let mut cells = Vec::with_capacity(n * n);
    for (i, row) in matrix.iter().enumerate() {
        let y0 = (n - 1 - i) as f64;
        for (j, &value) in row.iter().enumerate() {
            // Undefined correlations are left empty.
            if !value.is_finite() {
                continue;
            }
            let color = style.heatmap.map(value, lo, hi);
            let text_color = if color.luminance() < DARK_LUMINANCE {
                Rgb::WHITE
            } else {
                style.text
            };
            cells.push(Cell {
                x0: j as f64,
                y0,
                x1: j as f64 + 1.0,
                y1: y0 + 1.0,
                color,
                text: Some(format!("{value}")),
                text_color,
            });
        }
    }

    let mut fig = Figure::grid(1, 1, (10.0, 10.0), style);
    let panel = fig.panel_mut(0, 0);
    panel.frameless = true;
    panel.x_axis = Axis::Categorical(
        names
            .iter()
            .enumerate()
            .map(|(j, name)| (j as f64 + 0.5, name.clone()))
            .collect(),
    );
    panel.y_axis = Axis::Categorical(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ((n - 1 - i) as f64 + 0.5, name.clone()))
            .collect(),
    );
    panel.marks.push(Mark::Cells { cells });

    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};
    use crate::plots::fixtures::corners_table;

    #[test]
    fn test_correlation_matrix_shape_and_diagonal() {
        let table = corners_table();
        let (names, matrix) = correlation(&table).unwrap();
        assert_eq!(names.len(), table.n_columns() - 1);
        assert_eq!(names[0], "gt_corners");
        assert_eq!(matrix.len(), table.n_columns() - 1);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row.len(), matrix.len());
            assert_eq!(row[i], 1.0);
        }
    }

    #[test]
    fn test_heatmap_cells_are_annotated() {
        let fig = build(&corners_table(), &Style::default()).unwrap();
        let panel = fig.panel(0, 0);
        let Mark::Cells { cells } = &panel.marks[0] else {
            panic!("expected cells");
        };
        assert_eq!(cells.len(), 100);
        // Top-left cell is gt_corners with itself
        let top_left = cells
            .iter()
            .find(|c| c.x0 == 0.0 && c.y0 == 9.0)
            .unwrap();
        assert_eq!(top_left.text.as_deref(), Some("1"));
    }

    #[test]
    fn test_heatmap_rejects_categorical_columns() {
        let table = Table::new(vec![
            Column {
                name: "id".into(),
                data: ColumnData::Categorical(vec![Some("a".into())]),
            },
            Column {
                name: "label".into(),
                data: ColumnData::Categorical(vec![Some("b".into())]),
            },
        ]);
        assert_eq!(
            build(&table, &Style::default()).unwrap_err(),
            ShapeError::NonNumeric {
                name: "label".into()
            }
        );
    }
}
