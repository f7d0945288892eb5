//! Command line interface for the SMuFL glyph builder
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use clap::Parser;
use std::path::{Path, PathBuf};

/// smufl-builder CLI arguments
///
/// Examples:
///   smufl-builder MyFont.ufo                         # Build in place
///   smufl-builder MyFont.ufo --output Built.ufo      # Keep the source untouched
///   smufl-builder MyFont.ufo --config settings.json  # Use a settings file
///   smufl-builder MyFont.ufo --log-file              # Also log to ~/.config/smufl-builder/logs
///   smufl-builder --new-config                       # Write the default settings
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "smufl-builder",
    version,
    about = "Builds composite SMuFL glyphs in a UFO font",
    long_about = "smufl-builder composes staves, barlines, time signatures, notes, flags, octaves, dynamics and accordion registrations from a small set of hand-drawn parent glyphs. Missing parents can be drawn from the settings."
)]
pub struct CliArgs {
    /// UFO font to build into
    #[clap(
        value_name = "FONT.ufo",
        required_unless_present = "new_config",
        help = "UFO font source to build into"
    )]
    pub font_source: Option<PathBuf>,

    /// Settings file overriding the built-in defaults
    ///
    /// When absent, ~/.config/smufl-builder/settings.json is used if it exists.
    #[clap(
        long = "config",
        short = 'c',
        value_name = "FILE",
        help = "Settings file (JSON) overriding the built-in defaults"
    )]
    pub config: Option<PathBuf>,

    /// Where to save the built font; defaults to the source itself
    #[clap(
        long = "output",
        short = 'o',
        value_name = "DIR",
        help = "Save the built font here instead of in place"
    )]
    pub output: Option<PathBuf>,

    /// Write logs to a dated file as well as the terminal
    #[clap(
        long = "log-file",
        help = "Also write logs to ~/.config/smufl-builder/logs/"
    )]
    pub log_file: bool,

    /// Write a JSON summary of what each family built
    #[clap(
        long = "report",
        value_name = "FILE",
        help = "Write a JSON report of appended, skipped and drawn glyphs"
    )]
    pub report: Option<PathBuf>,

    /// Initialize user configuration directory with the default settings
    ///
    /// This creates the ~/.config/smufl-builder directory with:
    /// - settings.json: every option with its default value
    /// - logs/: destination of --log-file
    #[clap(
        long = "new-config",
        help = "Initialize ~/.config/smufl-builder with the default settings"
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that the font exists and looks like a UFO before any
    /// settings are read, providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.font_source {
            validate_ufo(path)?;
        }
        if let Some(config) = &self.config {
            if !config.is_file() {
                return Err(format!(
                    "Settings file does not exist: {}\nMake sure the path is correct.",
                    config.display()
                ));
            }
        }
        Ok(())
    }

    /// Path the built font is saved to
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output.as_ref().or(self.font_source.as_ref())
    }
}

fn validate_ufo(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!(
            "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
            path.display()
        ));
    }
    if !path.is_dir() {
        return Err(format!(
            "Not a UFO directory: {}\nThe font must be a UFO version 3 package.",
            path.display()
        ));
    }
    if !path.join("metainfo.plist").exists() {
        return Err(format!(
            "Not a valid UFO directory: missing metainfo.plist in {}\n\
             Make sure this is a valid UFO directory.",
            path.display()
        ));
    }
    Ok(())
}
