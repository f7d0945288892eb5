//! Application runner logic
//!
//! Loads the font and settings, runs every included family and writes the
//! result back to disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::build::{self, BuildContext, RunReport};
use crate::core::cli::CliArgs;
use crate::core::config::{Config, ConfigFile};
use crate::data::{load_ufo_from_path, save_ufo_to_path};
use crate::font_source::GlyphStore;
use crate::logging;

/// Run the builder with the given CLI arguments.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // Handle --new-config flag specially
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    let _guard = logging::init_tracing(cli_args.log_file).context("Failed to set up logging")?;

    let source = cli_args
        .font_source
        .as_deref()
        .context("No font source given")?;
    let output = cli_args.output_path().map(|p| p.as_path()).unwrap_or(source);
    let user = match &cli_args.config {
        Some(path) => ConfigFile::load_from(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => ConfigFile::load().unwrap_or_default(),
    };

    let report = build_ufo(source, output, user)?;
    if let Some(path) = &cli_args.report {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }
    println!(
        "Built {} glyphs ({} parents drawn, {} incomplete) into {}",
        report.appended_count(),
        report.synthesized_count(),
        report.incomplete_count(),
        output.display()
    );
    Ok(())
}

/// Build every included family of the UFO at `source` and save it to
/// `output`, which may be the same package.
pub fn build_ufo(source: &Path, output: &Path, user: ConfigFile) -> Result<RunReport> {
    let font = load_ufo_from_path(source)?;
    let store = GlyphStore::new(font);
    info!(
        "Loaded {} glyphs at {} units per em",
        store.glyph_count(),
        store.units_per_em()
    );

    let defaults = ConfigFile::defaults().context("Built-in settings are invalid")?;
    let config = Config::new(defaults, user, store.units_per_em());
    let mut ctx = BuildContext::new(store, config).context("Invalid [Global] settings")?;
    build::run(&mut ctx).context("Build aborted")?;

    let (store, report) = ctx.into_parts();
    save_ufo_to_path(store.font(), output)?;
    Ok(report)
}
