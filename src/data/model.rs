use std::fmt;

use crate::error::ShapeError;

// ---------------------------------------------------------------------------
// CellValue – a single parsed JSON cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from the source, before the column's
/// type is settled.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn is_numeric_or_null(&self) -> bool {
        matches!(
            self,
            CellValue::Float(_) | CellValue::Integer(_) | CellValue::Null
        )
    }
}

// ---------------------------------------------------------------------------
// Column – one named, homogeneous sequence
// ---------------------------------------------------------------------------

/// Column storage. Numeric columns use `NaN` for missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Settle a column's type from its raw cells: all numbers (or nulls)
    /// make a numeric column, anything else makes it categorical.
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let data = if cells.iter().all(CellValue::is_numeric_or_null) {
            ColumnData::Numeric(
                cells
                    .iter()
                    .map(|c| c.as_f64().unwrap_or(f64::NAN))
                    .collect(),
            )
        } else {
            ColumnData::Categorical(
                cells
                    .into_iter()
                    .map(|c| match c {
                        CellValue::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
            )
        };
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, or a shape error naming the column.
    pub fn numeric(&self) -> Result<&[f64], ShapeError> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Categorical(_) => Err(ShapeError::NonNumeric {
                name: self.name.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete imported dataset
// ---------------------------------------------------------------------------

/// Positionally ordered columns with rows aligned by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table; every column must hold `n_rows` values.
    pub fn new(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Table { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Result<&Column, ShapeError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ShapeError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Columns from `start` onward; positional slicing like `iloc[:, start:]`.
    pub fn columns_from(&self, start: usize) -> Result<&[Column], ShapeError> {
        self.columns_range(start, self.columns.len())
    }

    /// Columns `start..end`, clamped at the right edge. An empty result is
    /// a shape error since every plot step needs at least one column.
    pub fn columns_range(&self, start: usize, end: usize) -> Result<&[Column], ShapeError> {
        let end = end.min(self.columns.len());
        if start >= end {
            return Err(ShapeError::EmptySlice {
                start,
                available: self.columns.len(),
            });
        }
        Ok(&self.columns[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(name: &str, values: &[f64]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::Numeric(values.to_vec()),
        }
    }

    #[test]
    fn test_column_type_inference() {
        let col = Column::from_cells(
            "a",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        let values = col.numeric().unwrap();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());

        let col = Column::from_cells("b", vec![CellValue::Integer(1), CellValue::String("x".into())]);
        assert_eq!(
            col.data,
            ColumnData::Categorical(vec![Some("1".into()), Some("x".into())])
        );
        assert!(matches!(col.numeric(), Err(ShapeError::NonNumeric { .. })));
    }

    #[test]
    fn test_columns_range_clamps_and_rejects_empty() {
        let table = Table::new(vec![
            numeric("a", &[1.0]),
            numeric("b", &[2.0]),
            numeric("c", &[3.0]),
        ]);
        assert_eq!(table.columns_range(1, 10).unwrap().len(), 2);
        assert_eq!(
            table.columns_from(3),
            Err(ShapeError::EmptySlice {
                start: 3,
                available: 3
            })
        );
        assert!(table.column("b").is_ok());
        assert!(table.column("z").is_err());
    }
}
