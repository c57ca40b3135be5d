//! PNG persistence of a catalogue
//!
//! Each figure is rasterised with `plotters` and encoded with `image` to
//! `<dir>/<name>.png`. Figures are written independently: a failure stops
//! the run but files already written stay on disk.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::{ExportError, ExportResult};
use crate::figure::Figure;
use crate::plots::Catalogue;

pub mod raster;

/// Export configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ExportConfig {
    /// Raster resolution; figure sizes are in inches.
    pub dpi: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { dpi: 100 }
    }
}

/// Write every figure to `<dir>/<name>.png`, returning the written paths in
/// catalogue order.
pub fn save_all(
    catalogue: &Catalogue,
    dir: &Path,
    config: &ExportConfig,
) -> ExportResult<Vec<PathBuf>> {
    check_directory(dir)?;
    let mut written = Vec::with_capacity(catalogue.len());
    for (name, figure) in catalogue.iter() {
        let path = dir.join(format!("{name}.png"));
        save_figure(figure, name.as_str(), &path, config)?;
        log::info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Rasterise and write a single figure.
pub fn save_figure(
    figure: &Figure,
    name: &str,
    path: &Path,
    config: &ExportConfig,
) -> ExportResult<()> {
    let (w, h, buf) = raster::render_rgb(figure, config.dpi).map_err(|message| {
        ExportError::Render {
            name: name.to_string(),
            message,
        }
    })?;
    let image = RgbImage::from_raw(w, h, buf).ok_or_else(|| ExportError::Render {
        name: name.to_string(),
        message: format!("buffer does not match {w}x{h}"),
    })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn check_directory(dir: &Path) -> ExportResult<()> {
    if !dir.exists() {
        return Err(ExportError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(ExportError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::{build_all, fixtures::corners_table};
    use crate::style::Style;

    #[test]
    fn test_save_all_writes_one_png_per_entry() {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig { dpi: 30 };

        let written = save_all(&catalogue, dir.path(), &config).unwrap();
        assert_eq!(written.len(), catalogue.len());

        let mut files: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(
            files,
            vec!["boxplots.png", "corners_hist.png", "heatmap.png", "hists.png", "map.png"]
        );

        let img = image::open(dir.path().join("boxplots.png")).unwrap();
        assert_eq!((img.width(), img.height()), (360, 270));
    }

    #[test]
    fn test_failed_write_keeps_earlier_files() {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way of heatmap.png makes that write fail
        std::fs::create_dir(dir.path().join("heatmap.png")).unwrap();

        let err = save_all(&catalogue, dir.path(), &ExportConfig { dpi: 20 }).unwrap_err();
        let ExportError::Write { path, .. } = &err else {
            panic!("expected a write error, got {err:?}");
        };
        assert_eq!(path, &dir.path().join("heatmap.png"));

        for name in ["corners_hist.png", "boxplots.png", "hists.png"] {
            assert!(dir.path().join(name).is_file(), "{name} was removed");
        }
        assert!(!dir.path().join("map.png").exists());
    }

    #[test]
    fn test_save_all_missing_directory() {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = save_all(&catalogue, &missing, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::MissingDirectory { .. }));
        assert!(!missing.exists());
    }

    #[test]
    fn test_save_all_rejects_file_as_directory() {
        let catalogue = build_all(&corners_table(), &Style::default()).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = save_all(&catalogue, file.path(), &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::NotADirectory { .. }));
    }
}
