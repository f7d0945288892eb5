//! Run-wide settings from the `[Global]` section
//!
//! These are validated once, before any glyph is written, so that a typo in
//! the replace policy or timestamp cannot half-build a font.

use chrono::{DateTime, Local};

use super::Config;
use crate::core::errors::ConfigError;

pub const GLOBAL: &str = "Global";

/// What happens when a build target already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// Keep the existing glyph
    Skip,
    /// Move the existing glyph to `name_timestamp` and clear its codepoint
    Rename,
    Overwrite,
}

impl TryFrom<i64> for ReplacePolicy {
    type Error = ConfigError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ReplacePolicy::Skip),
            1 => Ok(ReplacePolicy::Rename),
            2 => Ok(ReplacePolicy::Overwrite),
            other => Err(ConfigError::ReplacePolicy(other)),
        }
    }
}

/// Timestamp pattern made of strftime field letters and separators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    raw: String,
    pattern: String,
}

impl TimestampFormat {
    pub const ALLOWED: &'static [char] = &['Y', 'm', 'd', 'H', 'M', 'S', '.', ':', '-', '_'];

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.is_empty() || raw.chars().any(|c| !Self::ALLOWED.contains(&c)) {
            return Err(ConfigError::Timestamp(raw.to_string()));
        }
        // Field letters become strftime specifiers, separators stay literal
        let pattern = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    format!("%{c}")
                } else {
                    c.to_string()
                }
            })
            .collect();
        Ok(Self {
            raw: raw.to_string(),
            pattern,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn format(&self, time: &DateTime<Local>) -> String {
        time.format(&self.pattern).to_string()
    }

    pub fn now(&self) -> String {
        self.format(&Local::now())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    pub draw_missing: bool,
    pub replace_policy: ReplacePolicy,
    /// Hue 1-255 of the QA highlight, 0 for none
    pub mark_colour: i64,
    pub timestamp: TimestampFormat,
}

impl GlobalSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            draw_missing: config.get_bool(GLOBAL, "draw missing")?,
            replace_policy: ReplacePolicy::try_from(config.get_int(GLOBAL, "handle replaced")?)?,
            mark_colour: config.get_int(GLOBAL, "mark colour")?,
            timestamp: TimestampFormat::parse(&config.get_string(GLOBAL, "timestamp")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn replace_policy_codes() {
        assert_eq!(ReplacePolicy::try_from(0), Ok(ReplacePolicy::Skip));
        assert_eq!(ReplacePolicy::try_from(2), Ok(ReplacePolicy::Overwrite));
        assert_eq!(ReplacePolicy::try_from(3), Err(ConfigError::ReplacePolicy(3)));
        assert_eq!(ReplacePolicy::try_from(-1), Err(ConfigError::ReplacePolicy(-1)));
    }

    #[test]
    fn timestamp_uses_only_allowed_characters() {
        assert!(TimestampFormat::parse("Ymd_HMS").is_ok());
        assert!(TimestampFormat::parse("Y-m-d.H:M").is_ok());
        assert!(matches!(
            TimestampFormat::parse("Ymd%"),
            Err(ConfigError::Timestamp(_))
        ));
        assert!(TimestampFormat::parse("y").is_err());
        assert!(TimestampFormat::parse("").is_err());
    }

    #[test]
    fn timestamp_formats_local_time() {
        let format = TimestampFormat::parse("Ymd_HMS").unwrap();
        let time = Local.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format.format(&time), "20210304_050607");
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::with_defaults(1000.0).unwrap();
        let settings = GlobalSettings::from_config(&config).unwrap();
        assert!(settings.draw_missing);
        assert_eq!(settings.replace_policy, ReplacePolicy::Rename);
        assert_eq!(settings.timestamp.raw(), "Ymd_HMS");
    }
}
