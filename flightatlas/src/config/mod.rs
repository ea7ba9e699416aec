//! Configuration loading.
//!
//! Settings come from an INI file overlaid onto [`Settings::default()`]:
//! absent sections and keys keep their defaults, unknown keys are
//! ignored, and values that fail to parse are reported with their
//! section and key rather than silently dropped.

mod settings;

pub use settings::{ApiSettings, CacheSettings, LoggingSettings, Settings};

use std::path::Path;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::cache::{ValidityPolicy, DEFAULT_MAX_AGE};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read or parsed as INI.
    #[error("Failed to read config file: {0}")]
    Read(String),

    /// A key held a value that does not parse for its setting.
    #[error("Invalid value for [{section}] {key} = '{value}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl Settings {
    /// Loads settings from an INI file, overlaying onto the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref()).map_err(|e| ConfigError::Read(e.to_string()))?;
        parse_ini(&ini)
    }

    /// Loads settings from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

fn parse_ini(ini: &Ini) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(section) = ini.section(Some("api")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim_end_matches('/');
            if v.is_empty() {
                return Err(invalid("api", "base_url", v, "must not be empty"));
            }
            settings.api.base_url = v.to_string();
        }
        if let Some(v) = section.get("reference_attempts") {
            settings.api.reference_attempts = parse_attempts("api", "reference_attempts", v)?;
        }
        if let Some(v) = section.get("reference_retry_delay_ms") {
            settings.api.reference_retry_delay =
                parse_millis("api", "reference_retry_delay_ms", v)?;
        }
        if let Some(v) = section.get("poll_attempts") {
            settings.api.poll_attempts = parse_attempts("api", "poll_attempts", v)?;
        }
        if let Some(v) = section.get("poll_interval_ms") {
            settings.api.poll_interval = parse_millis("api", "poll_interval_ms", v)?;
        }
    }

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            settings.cache.directory = v.into();
        }
        if let Some(v) = section.get("validity") {
            settings.cache.validity = match v.to_lowercase().as_str() {
                "24h" | "max_age" => ValidityPolicy::MaxAge(DEFAULT_MAX_AGE),
                "month" | "calendar_month" => ValidityPolicy::CalendarMonth,
                other => {
                    return Err(invalid(
                        "cache",
                        "validity",
                        other,
                        "must be one of: 24h, month",
                    ))
                }
            };
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            settings.logging.directory = v.to_string();
        }
        if let Some(v) = section.get("file") {
            settings.logging.file = v.to_string();
        }
    }

    Ok(settings)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_attempts(section: &str, key: &str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(invalid(section, key, value, "must be a positive integer")),
    }
}

fn parse_millis(section: &str, key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| invalid(section, key, value, "must be an integer millisecond count"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::load_or_default("/nonexistent/flightatlas.ini").unwrap();
        assert_eq!(settings.api.base_url, "https://api.flightatlas.io");
        assert_eq!(settings.api.poll_attempts, 10);
        assert_eq!(settings.api.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn file_values_overlay_defaults() {
        let file = write_config(
            "[api]\n\
             base_url = http://localhost:8080/\n\
             poll_attempts = 3\n\
             poll_interval_ms = 50\n\
             \n\
             [cache]\n\
             directory = /tmp/fa-cache\n\
             validity = month\n",
        );

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8080");
        assert_eq!(settings.api.poll_attempts, 3);
        assert_eq!(settings.api.poll_interval, Duration::from_millis(50));
        assert_eq!(settings.cache.directory.to_str(), Some("/tmp/fa-cache"));
        assert_eq!(settings.cache.validity, ValidityPolicy::CalendarMonth);
        // Untouched section keeps defaults
        assert_eq!(settings.logging.file, "flightatlas.log");
    }

    #[test]
    fn invalid_validity_is_rejected_with_context() {
        let file = write_config("[cache]\nvalidity = fortnight\n");
        let err = Settings::load(file.path()).unwrap_err();
        match err {
            ConfigError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "cache");
                assert_eq!(key, "validity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_attempts_rejected() {
        let file = write_config("[api]\npoll_attempts = 0\n");
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let file = write_config("[api]\nfuture_flag = yes\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.api.poll_attempts, 10);
    }
}
