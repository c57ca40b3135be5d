use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use url::Url;

use super::model::{CellValue, Column, Table};
use crate::error::{ImportError, ImportResult};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Where a JSON document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// Classify a location string. `http(s)` URLs are fetched, `file` URIs
    /// are decoded to a local path, and anything that is not a URL is taken
    /// as a path as given.
    pub fn parse(location: &str) -> ImportResult<Self> {
        let Ok(url) = Url::parse(location) else {
            return Ok(Source::Path(PathBuf::from(location)));
        };
        match url.scheme() {
            "http" | "https" => Ok(Source::Url(location.to_string())),
            "file" => url
                .to_file_path()
                .map(Source::Path)
                .map_err(|()| ImportError::InvalidFileUri {
                    uri: location.to_string(),
                }),
            // Drive letters such as `C:` parse as a scheme
            _ => Ok(Source::Path(PathBuf::from(location))),
        }
    }
}

/// Load a table from a path or URI.
pub fn load_source(location: &str) -> ImportResult<Table> {
    match Source::parse(location)? {
        Source::Path(path) => load_file(&path),
        Source::Url(url) => {
            let text = fetch(&url)?;
            let table = parse_json(&text)?;
            log::info!(
                "Imported {} rows x {} columns from {url}",
                table.n_rows(),
                table.n_columns()
            );
            Ok(table)
        }
    }
}

/// Load a table from a local JSON file.
pub fn load_file(path: &Path) -> ImportResult<Table> {
    if !path.exists() {
        return Err(ImportError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_json(&text)?;
    log::info!(
        "Imported {} rows x {} columns from {}",
        table.n_rows(),
        table.n_columns(),
        path.display()
    );
    Ok(table)
}

fn fetch(url: &str) -> ImportResult<String> {
    let fetch_err = |source| ImportError::Fetch {
        url: url.to_string(),
        source,
    };
    reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(fetch_err)
}

// ---------------------------------------------------------------------------
// JSON layouts
// ---------------------------------------------------------------------------

/// Parse a JSON document in any of the common dataframe layouts:
///
/// ```json
/// [{"a": 1, "b": 2}, {"a": 3, "b": 4}]              // records
/// {"a": {"0": 1, "1": 3}, "b": {"0": 2, "1": 4}}    // columns
/// {"a": [1, 3], "b": [2, 4]}                        // columns (lists)
/// {"columns": ["a", "b"], "data": [[1, 2], [3, 4]]} // split
/// [[1, 2], [3, 4]]                                  // values
/// ```
pub fn parse_json(text: &str) -> ImportResult<Table> {
    let root: JsonValue = serde_json::from_str(text)?;

    match root {
        JsonValue::Array(rows) => {
            if rows.iter().all(JsonValue::is_array) && !rows.is_empty() {
                from_values(&rows)
            } else {
                from_records(&rows)
            }
        }
        JsonValue::Object(obj) => {
            if obj.contains_key("columns") && obj.contains_key("data") {
                from_split(&obj)
            } else {
                from_columns(&obj)
            }
        }
        other => Err(shape(format!(
            "expected a top-level array or object, found {}",
            json_kind(&other)
        ))),
    }
}

/// `[{...}, {...}]`: columns in first-appearance order, missing fields null.
fn from_records(rows: &[JsonValue]) -> ImportResult<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| shape(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = objects
                .iter()
                .map(|obj| obj.get(&name).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            Column::from_cells(name, cells)
        })
        .collect();

    Ok(Table::new(columns))
}

/// `{"col": {"idx": v}}` or `{"col": [v, ...]}`.
fn from_columns(obj: &Map<String, JsonValue>) -> ImportResult<Table> {
    if obj.values().all(JsonValue::is_array) {
        let mut n_rows = None;
        let mut columns = Vec::with_capacity(obj.len());
        for (name, values) in obj {
            let values = values.as_array().map(Vec::as_slice).unwrap_or_default();
            match n_rows {
                None => n_rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(shape(format!(
                        "column '{name}' has {} values, expected {n}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }
            columns.push(Column::from_cells(
                name.clone(),
                values.iter().map(json_to_cell).collect(),
            ));
        }
        return Ok(Table::new(columns));
    }

    if obj.values().any(JsonValue::is_array) {
        return Err(shape(
            "columns layout mixes list columns and object columns".to_string(),
        ));
    }

    // Index labels across all columns, in first-appearance order.
    let mut index: Vec<&str> = Vec::new();
    for (name, values) in obj {
        let cells = values
            .as_object()
            .ok_or_else(|| shape(format!("column '{name}' is neither an object nor an array")))?;
        for label in cells.keys() {
            if !index.contains(&label.as_str()) {
                index.push(label);
            }
        }
    }

    let columns = obj
        .iter()
        .map(|(name, values)| {
            let cells = values.as_object();
            let cells = index
                .iter()
                .map(|label| {
                    cells
                        .and_then(|c| c.get(*label))
                        .map(json_to_cell)
                        .unwrap_or(CellValue::Null)
                })
                .collect();
            Column::from_cells(name.clone(), cells)
        })
        .collect();

    Ok(Table::new(columns))
}

/// `{"columns": [...], "data": [[...], ...]}`; an `index` key is ignored.
fn from_split(obj: &Map<String, JsonValue>) -> ImportResult<Table> {
    let names: Vec<String> = obj
        .get("columns")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| shape("'columns' must be an array".to_string()))?
        .iter()
        .map(|v| match v {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let rows = obj
        .get("data")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| shape("'data' must be an array".to_string()))?;

    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row
                .as_array()
                .ok_or_else(|| shape(format!("data row {i} is not an array")))?;
            if row.len() != names.len() {
                return Err(shape(format!(
                    "data row {i} has {} values, expected {}",
                    row.len(),
                    names.len()
                )));
            }
            Ok(row.as_slice())
        })
        .collect::<ImportResult<Vec<_>>>()?;

    Ok(transpose(names, &rows))
}

/// `[[...], [...]]`: columns named by position.
fn from_values(rows: &[JsonValue]) -> ImportResult<Table> {
    let rows: Vec<&[JsonValue]> = rows
        .iter()
        .filter_map(|r| r.as_array().map(Vec::as_slice))
        .collect();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let names = (0..width).map(|i| i.to_string()).collect();
    Ok(transpose(names, &rows))
}

fn transpose(names: Vec<String>, rows: &[&[JsonValue]]) -> Table {
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            let cells = rows
                .iter()
                .map(|row| row.get(j).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            Column::from_cells(name, cells)
        })
        .collect();
    Table::new(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn shape(message: String) -> ImportError {
    ImportError::Shape { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnData;
    use std::io::Write;

    #[test]
    fn test_records_keep_field_order() {
        let table = parse_json(r#"[{"name": "a", "z": 1, "b": 2.5}, {"name": "b", "z": 3, "b": 4}]"#)
            .unwrap();
        assert_eq!(table.column_names(), vec!["name", "z", "b"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("b").unwrap().numeric().unwrap(), &[2.5, 4.0]);
        assert!(matches!(
            table.column("name").unwrap().data,
            ColumnData::Categorical(_)
        ));
    }

    #[test]
    fn test_records_with_missing_fields_are_lenient() {
        let table = parse_json(r#"[{"a": 1}, {"a": 2, "b": 5}]"#).unwrap();
        assert_eq!(table.n_columns(), 2);
        let b = table.column("b").unwrap().numeric().unwrap();
        assert!(b[0].is_nan());
        assert_eq!(b[1], 5.0);
    }

    #[test]
    fn test_columns_orient() {
        let table =
            parse_json(r#"{"a": {"0": 1, "1": 2}, "b": {"0": 3, "2": 4}}"#).unwrap();
        assert_eq!(table.n_rows(), 3);
        let a = table.column("a").unwrap().numeric().unwrap();
        assert!(a[2].is_nan());

        let table = parse_json(r#"{"a": [1, 2], "b": [3, 4]}"#).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert!(parse_json(r#"{"a": [1, 2], "b": [3]}"#).is_err());
    }

    #[test]
    fn test_columns_orient_rejects_mixed_lists_and_objects() {
        let err = parse_json(r#"{"a": [1, 2], "b": {"0": 1}}"#).unwrap_err();
        let ImportError::Shape { message } = err else {
            panic!("expected a shape error, got {err:?}");
        };
        assert!(message.contains("mixes list columns and object columns"));

        let err = parse_json(r#"{"a": {"0": 1}, "b": 3}"#).unwrap_err();
        assert!(err.to_string().contains("column 'b'"));
    }

    #[test]
    fn test_split_and_values_orient() {
        let table =
            parse_json(r#"{"columns": ["x", "y"], "index": [0, 1], "data": [[1, 2], [3, 4]]}"#)
                .unwrap();
        assert_eq!(table.column_names(), vec!["x", "y"]);
        assert_eq!(table.column("y").unwrap().numeric().unwrap(), &[2.0, 4.0]);

        let table = parse_json("[[1, 2, 3], [4, 5, 6]]").unwrap();
        assert_eq!(table.column_names(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_malformed_json_is_import_error() {
        assert!(matches!(parse_json("[{\"a\": 1,"), Err(ImportError::Json(_))));
        assert!(matches!(parse_json("42"), Err(ImportError::Shape { .. })));
        assert!(matches!(parse_json("[1, 2]"), Err(ImportError::Shape { .. })));
    }

    #[test]
    fn test_load_file_missing_and_present() {
        let err = load_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ImportError::NotFound { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"rb_corners": 4, "gt_corners": 4}}]"#).unwrap();
        let location = format!("file://{}", file.path().display());
        let table = load_source(&location).unwrap();
        assert_eq!(table.column_names(), vec!["rb_corners", "gt_corners"]);
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://host/data.json").unwrap(),
            Source::Url("https://host/data.json".into())
        );
        assert_eq!(
            Source::parse("file:///tmp/x.json").unwrap(),
            Source::Path(PathBuf::from("/tmp/x.json"))
        );
        assert_eq!(
            Source::parse("file:///tmp/my%20data.json").unwrap(),
            Source::Path(PathBuf::from("/tmp/my data.json"))
        );
        assert_eq!(
            Source::parse("file://localhost/tmp/x.json").unwrap(),
            Source::Path(PathBuf::from("/tmp/x.json"))
        );
        assert!(matches!(
            Source::parse("file://otherhost/tmp/x.json"),
            Err(ImportError::InvalidFileUri { .. })
        ));
        assert_eq!(
            Source::parse("x.json").unwrap(),
            Source::Path(PathBuf::from("x.json"))
        );
    }

    #[test]
    fn test_load_file_uri_with_escaped_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my data.json");
        std::fs::write(&path, r#"[{"a": 1}]"#).unwrap();

        let uri = Url::from_file_path(&path).unwrap().to_string();
        assert!(uri.contains("my%20data.json"));
        let table = load_source(&uri).unwrap();
        assert_eq!(table.column_names(), vec!["a"]);
    }
}
