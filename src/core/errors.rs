//! Error types for the glyph builder
//!
//! Configuration and dataset problems are authoring mistakes and abort the
//! run. Store problems are local to the rule being built and are logged by
//! the family driver, which then moves on to the next rule.

use thiserror::Error;

/// Invalid or missing configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing option [{section}][{option}]")]
    MissingOption { section: String, option: String },

    #[error("invalid value for [{section}][{option}]: {value}")]
    InvalidValue {
        section: String,
        option: String,
        value: String,
    },

    #[error("[{section}][{option}] must be a number, found '{value}'")]
    ExpectedNumber {
        section: String,
        option: String,
        value: String,
    },

    #[error("please choose a valid setting for [Global][handle replaced]: {0} is not 0, 1 or 2")]
    ReplacePolicy(i64),

    #[error("invalid [Global][timestamp] setting '{0}': use only Y m d H M S . : - _")]
    Timestamp(String),

    #[error("could not parse settings: {0}")]
    Parse(String),
}

/// Malformed composition tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("unknown placement token '{token}' in rule {target}")]
    UnknownPlacement { target: String, token: String },

    #[error("rule {0} has no placements")]
    EmptyRule(String),
}

/// Failures while reading or writing the glyph store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid glyph name '{0}'")]
    InvalidName(String),

    #[error("could not rename glyph '{from}' to '{to}': {reason}")]
    Rename {
        from: String,
        to: String,
        reason: String,
    },

    #[error("glyph '{0}' is not in the font")]
    MissingGlyph(String),

    #[error("failed to load UFO: {0}")]
    Load(String),

    #[error("failed to save UFO: {0}")]
    Save(String),
}

/// Anything that can stop a rule or a run
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BuildError {
    /// Whether the error must abort the whole run instead of a single rule.
    pub fn is_fatal(&self) -> bool {
        match self {
            BuildError::Config(_) | BuildError::Dataset(_) => true,
            BuildError::Store(error) => matches!(error, StoreError::Load(_) | StoreError::Save(_)),
        }
    }
}
