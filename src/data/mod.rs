/// Data layer: table model, JSON import, and the statistics the plots use.
///
/// Architecture:
/// ```text
///  path / file:// / http(s)://
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse JSON (records, columns, split, values) → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered, typed columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  histograms, box stats, correlation, KDE
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
