//! Statistical plot catalogue for room-corner detection results.
//!
//! ```text
//!  JSON ──► data::loader ──► Table ──► plots::build_all ──► Catalogue
//!                                                             │
//!                                       ┌─────────────────────┴──────┐
//!                                       ▼                            ▼
//!                              app::present (window)      export::save_all (PNG)
//! ```

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod export;
pub mod figure;
pub mod plots;
pub mod state;
pub mod style;
pub mod ui;

pub use data::loader::{load_file, load_source};
pub use data::model::Table;
pub use error::{BuildError, ExportError, ImportError, ShapeError};
pub use export::{save_all, ExportConfig};
pub use figure::Figure;
pub use plots::{build_all, Catalogue, PlotName};
pub use style::{Style, Theme};
