//! Configuration file handling
//!
//! Settings are JSON objects of sections holding option/value pairs. The
//! built-in defaults ship inside the binary; user overrides live in
//! ~/.config/smufl-builder/settings.json or a file passed on the command line.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::errors::ConfigError;

const DEFAULTS_JSON: &str = include_str!("../../../assets/defaults.json");

/// One settings source: section -> option -> raw value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFile {
    pub sections: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ConfigFile {
    /// The built-in defaults
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_json(DEFAULTS_JSON)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Get the path to the smufl-builder config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("smufl-builder")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load user overrides from the default location, if present
    pub fn load() -> Option<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return None;
        }

        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Load a settings file from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        debug!("Loaded user settings from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&Value> {
        self.sections.get(section)?.get(option)
    }

    pub fn set(&mut self, section: &str, option: &str, value: Value) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), value);
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/smufl-builder directory
    /// 2. A settings.json file holding the default values
    /// 3. A logs/ directory for run logs
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();

        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = crate::logging::logs_dir();
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::defaults()?.save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("You can now:");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View run logs in: {:?}", logs_dir);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let defaults = ConfigFile::defaults().unwrap();
        assert_eq!(
            defaults.get("Global", "handle replaced"),
            Some(&Value::from(1))
        );
        assert!(defaults.sections.contains_key("Accordion"));
    }

    #[test]
    fn settings_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut config = ConfigFile::default();
        config.set("Barlines", "barline separation", Value::from(0.5));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = ConfigFile::from_json("{ not json").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
