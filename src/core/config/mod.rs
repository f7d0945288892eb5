//! Configuration resolution
//!
//! Options are looked up in the user overrides first and the built-in
//! defaults second. Numeric options are measured in staff spaces when
//! `[Global] values in staff spaces` is set and in font units otherwise;
//! a numeral wrapped in parentheses, such as `"(250)"`, is always taken in
//! font units.

pub mod settings;
pub mod user_config;

use std::collections::BTreeSet;

use serde_json::Value;

use crate::core::errors::ConfigError;

pub use settings::{GlobalSettings, ReplacePolicy, TimestampFormat};
pub use user_config::ConfigFile;

/// A resolved option value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Font units, truncated toward zero
    Units(f64),
    Text(String),
}

/// Two-tier settings with staff-space conversion
#[derive(Debug, Clone)]
pub struct Config {
    defaults: ConfigFile,
    user: ConfigFile,
    staff_space: f64,
}

impl Config {
    pub fn new(defaults: ConfigFile, user: ConfigFile, units_per_em: f64) -> Self {
        Self {
            defaults,
            user,
            staff_space: units_per_em / 4.0,
        }
    }

    /// Built-in defaults without user overrides
    pub fn with_defaults(units_per_em: f64) -> Result<Self, ConfigError> {
        Ok(Self::new(ConfigFile::defaults()?, ConfigFile::default(), units_per_em))
    }

    pub fn staff_space(&self) -> f64 {
        self.staff_space
    }

    pub fn user_mut(&mut self) -> &mut ConfigFile {
        &mut self.user
    }

    pub fn raw(&self, section: &str, option: &str) -> Option<&Value> {
        self.user
            .get(section, option)
            .or_else(|| self.defaults.get(section, option))
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.raw(section, option).is_some()
    }

    /// Option names of a section across both tiers, sorted
    pub fn options(&self, section: &str) -> Vec<String> {
        let mut names = BTreeSet::new();
        for source in [&self.defaults, &self.user] {
            if let Some(options) = source.sections.get(section) {
                names.extend(options.keys().cloned());
            }
        }
        names.into_iter().collect()
    }

    fn require(&self, section: &str, option: &str) -> Result<&Value, ConfigError> {
        self.raw(section, option)
            .ok_or_else(|| ConfigError::MissingOption {
                section: section.to_string(),
                option: option.to_string(),
            })
    }

    fn invalid(section: &str, option: &str, value: &Value) -> ConfigError {
        ConfigError::InvalidValue {
            section: section.to_string(),
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool, ConfigError> {
        let value = self.require(section, option)?;
        match value {
            Value::Bool(flag) => Ok(*flag),
            Value::Number(number) => Ok(number.as_f64().map(|n| n != 0.0).unwrap_or(false)),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(Self::invalid(section, option, value)),
            },
            _ => Err(Self::invalid(section, option, value)),
        }
    }

    pub fn get_float(&self, section: &str, option: &str) -> Result<f64, ConfigError> {
        let value = self.require(section, option)?;
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.ok_or_else(|| ConfigError::ExpectedNumber {
            section: section.to_string(),
            option: option.to_string(),
            value: value.to_string(),
        })
    }

    pub fn get_int(&self, section: &str, option: &str) -> Result<i64, ConfigError> {
        let number = self.get_float(section, option)?;
        if number.fract() != 0.0 {
            return Err(ConfigError::InvalidValue {
                section: section.to_string(),
                option: option.to_string(),
                value: number.to_string(),
            });
        }
        Ok(number as i64)
    }

    pub fn get_string(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        match self.require(section, option)? {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(Self::invalid(section, option, other)),
        }
    }

    /// Resolve an option to font units or text.
    pub fn resolve(&self, section: &str, option: &str) -> Result<ConfigValue, ConfigError> {
        let value = self.require(section, option)?;
        let staff_spaces = self.get_bool(settings::GLOBAL, "values in staff spaces")?;
        let scaled = |number: f64| {
            if staff_spaces {
                (number * self.staff_space).trunc()
            } else {
                number.trunc()
            }
        };
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(|n| ConfigValue::Units(scaled(n)))
                .ok_or_else(|| Self::invalid(section, option, value)),
            Value::String(text) => {
                let trimmed = text.trim();
                if let Ok(number) = trimmed.parse::<f64>() {
                    return Ok(ConfigValue::Units(scaled(number)));
                }
                if let Some(literal) = parenthesized_number(trimmed) {
                    return Ok(ConfigValue::Units(literal.trunc()));
                }
                Ok(ConfigValue::Text(text.clone()))
            }
            _ => Err(Self::invalid(section, option, value)),
        }
    }

    /// Resolve an option that must be numeric.
    pub fn units(&self, section: &str, option: &str) -> Result<f64, ConfigError> {
        match self.resolve(section, option)? {
            ConfigValue::Units(units) => Ok(units),
            ConfigValue::Text(text) => Err(ConfigError::ExpectedNumber {
                section: section.to_string(),
                option: option.to_string(),
                value: text,
            }),
        }
    }

    /// Resolve an option as text, numbers included verbatim.
    pub fn text(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        self.get_string(section, option)
    }

    /// `[Include]` switch; absent switches are off.
    pub fn include(&self, key: &str) -> Result<bool, ConfigError> {
        if !self.has_option("Include", key) {
            return Ok(false);
        }
        self.get_bool("Include", key)
    }

    /// Whether `[Exclude]` lists `name` as true.
    pub fn is_excluded(&self, name: &str) -> Result<bool, ConfigError> {
        if !self.has_option("Exclude", name) {
            return Ok(false);
        }
        self.get_bool("Exclude", name)
    }
}

fn parenthesized_number(text: &str) -> Option<f64> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    inner.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(section: &str, option: &str, value: Value) -> Config {
        let mut config = Config::with_defaults(1000.0).unwrap();
        config.user_mut().set(section, option, value);
        config
    }

    #[test]
    fn staff_spaces_scale_by_quarter_em() {
        let config = config_with("Barlines", "barline separation", Value::from(0.5));
        assert_eq!(config.resolve("Barlines", "barline separation"), Ok(ConfigValue::Units(125.0)));

        let config = config_with("Barlines", "barline separation", Value::from(0.163));
        // 40.75 truncates
        assert_eq!(config.units("Barlines", "barline separation"), Ok(40.0));
    }

    #[test]
    fn parenthesized_values_are_font_units() {
        let config = config_with("Barlines", "barline separation", Value::from("(250)"));
        assert_eq!(config.units("Barlines", "barline separation"), Ok(250.0));
    }

    #[test]
    fn native_units_when_staff_spaces_are_off() {
        let mut config = config_with("Barlines", "barline separation", Value::from(120));
        config
            .user_mut()
            .set("Global", "values in staff spaces", Value::from(false));
        assert_eq!(config.units("Barlines", "barline separation"), Ok(120.0));
        config
            .user_mut()
            .set("Barlines", "thin barline thickness", Value::from("(40)"));
        assert_eq!(config.units("Barlines", "thin barline thickness"), Ok(40.0));
    }

    #[test]
    fn numeric_strings_count_as_numbers() {
        let config = config_with("Stems", "stem thickness", Value::from("0.5"));
        assert_eq!(config.units("Stems", "stem thickness"), Ok(125.0));
    }

    #[test]
    fn other_strings_are_text() {
        let config = Config::with_defaults(1000.0).unwrap();
        assert_eq!(
            config.resolve("Time Signatures", "cut time stroke"),
            Ok(ConfigValue::Text("timeSigVerticalStroke".to_string()))
        );
        assert!(matches!(
            config.units("Time Signatures", "cut time stroke"),
            Err(ConfigError::ExpectedNumber { .. })
        ));
    }

    #[test]
    fn booleans_cannot_be_resolved_as_values() {
        let config = config_with("Stems", "stem thickness", Value::from(true));
        assert!(matches!(
            config.resolve("Stems", "stem thickness"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn missing_options_are_reported() {
        let config = Config::with_defaults(1000.0).unwrap();
        assert_eq!(
            config.units("Stems", "no such option"),
            Err(ConfigError::MissingOption {
                section: "Stems".to_string(),
                option: "no such option".to_string(),
            })
        );
    }

    #[test]
    fn user_values_override_defaults() {
        let config = config_with("Include", "alternates", Value::from(true));
        assert_eq!(config.include("alternates"), Ok(true));
        assert_eq!(config.include("not a family"), Ok(false));
        assert!(config.options("Include").contains(&"alternates".to_string()));
    }

    #[test]
    fn exclusions_need_a_true_value() {
        let mut config = config_with("Exclude", "uniE031", Value::from(true));
        config.user_mut().set("Exclude", "uniE032", Value::from(false));
        assert_eq!(config.is_excluded("uniE031"), Ok(true));
        assert_eq!(config.is_excluded("uniE032"), Ok(false));
        assert_eq!(config.is_excluded("uniE033"), Ok(false));
    }
}
