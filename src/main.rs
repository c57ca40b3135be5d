use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use corner_plots::app::{present, ViewerConfig};
use corner_plots::{build_all, load_source, save_all, ExportConfig, Style, Theme};

#[derive(Parser)]
#[command(name = "corner-plots")]
#[command(about = "Plot corner-detection statistics from a JSON table")]
#[command(version)]
struct Cli {
    /// JSON source: a file path, file:// URI or http(s) URL
    source: String,

    /// Write every figure as <DIR>/<name>.png
    #[arg(long, value_name = "DIR")]
    save: Option<PathBuf>,

    /// Open the interactive viewer (default when --save is not given)
    #[arg(long)]
    show: bool,

    /// Raster resolution for saved figures
    #[arg(long, default_value_t = 100)]
    dpi: u32,

    /// Figure theme
    #[arg(long, value_enum, default_value_t = Theme::Darkgrid)]
    style: Theme,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table = load_source(&cli.source)
        .with_context(|| format!("importing {}", cli.source))?;
    let style = Style::from_theme(cli.style);
    let catalogue = build_all(&table, &style).context("building plots")?;

    let export = ExportConfig { dpi: cli.dpi };
    if let Some(dir) = &cli.save {
        let written = save_all(&catalogue, dir, &export)
            .with_context(|| format!("saving figures to {}", dir.display()))?;
        println!("Wrote {} figures to {}", written.len(), dir.display());
    }

    if cli.show || cli.save.is_none() {
        let config = ViewerConfig {
            export,
            ..ViewerConfig::default()
        };
        present(catalogue, &config)?;
    }
    Ok(())
}
