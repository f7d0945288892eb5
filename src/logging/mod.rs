//! Application logging functionality
//!
//! Installs the tracing subscriber and manages the dated log files

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::ConfigFile;

const DEFAULT_FILTER: &str = "info";

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Name of today's log file
pub fn log_file_name() -> String {
    let date = chrono::Local::now().format("%Y-%m-%d");
    format!("smufl-builder-{date}.log")
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    logs_dir().join(log_file_name())
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Install the global subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `info`). With
/// `to_file`, they are also appended to today's file in [`logs_dir`]; the
/// returned guard must be held until the run ends so the file is flushed.
pub fn init_tracing(to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let terminal = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if !to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(terminal)
            .try_init()?;
        return Ok(None);
    }

    initialize_logs_directory()?;
    let appender = tracing_appender::rolling::never(logs_dir(), log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer().with_ansi(false).with_writer(writer);
    tracing_subscriber::registry()
        .with(filter)
        .with(terminal)
        .with(file)
        .try_init()?;
    tracing::info!("Logging to {:?}", current_log_file());
    Ok(Some(guard))
}
