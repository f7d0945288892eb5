//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - CLI handling and the run entry point
//! - Layered configuration and run-wide settings
//! - Error types shared by the builders

pub mod cli;
pub mod config;
pub mod errors;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config::{Config, ConfigFile, ConfigValue, GlobalSettings, ReplacePolicy};
pub use errors::{BuildError, ConfigError, DatasetError, StoreError};
pub use runner::run_app;
