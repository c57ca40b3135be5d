//! Error types for the importer, the plot catalogue and the PNG persister.

use std::path::PathBuf;

use thiserror::Error;

use crate::plots::PlotName;

/// Failure to turn a JSON source into a [`Table`](crate::data::model::Table).
#[derive(Error, Debug)]
pub enum ImportError {
    /// Source file does not exist
    #[error("Data source not found: {path}")]
    NotFound { path: PathBuf },

    /// Source exists but could not be read
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `file://` URI that does not name a local path
    #[error("Not a local file URI: {uri}")]
    InvalidFileUri { uri: String },

    /// Remote source could not be fetched
    #[error("Failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Content is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that cannot be coerced into a table
    #[error("JSON cannot be read as a table: {message}")]
    Shape { message: String },
}

/// A plot step found the table narrower or differently typed than it needs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Column '{name}' not found")]
    MissingColumn { name: String },

    #[error("Column slice starting at position {start} is empty (table has {available} columns)")]
    EmptySlice { start: usize, available: usize },

    #[error("Column '{name}' is not numeric")]
    NonNumeric { name: String },
}

/// Catalogue construction failed; no partial catalogue is returned.
#[derive(Error, Debug)]
#[error("Building plot '{plot}' failed")]
pub struct BuildError {
    pub plot: PlotName,
    #[source]
    pub source: ShapeError,
}

/// Failure to persist figures (the file-write error class).
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Output directory does not exist: {path}")]
    MissingDirectory { path: PathBuf },

    #[error("Output path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Rasterisation of a figure failed before anything was written
    #[error("Rendering '{name}' failed: {message}")]
    Render { name: String, message: String },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
