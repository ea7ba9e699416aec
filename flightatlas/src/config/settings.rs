//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These
//! are pure data types; parsing lives in the parent module.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::ValidityPolicy;
use crate::client::{DEFAULT_BASE_URL, REFERENCE_FETCH_ATTEMPTS, REFERENCE_RETRY_DELAY};
use crate::poller::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};

/// Complete application configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Query API settings
    pub api: ApiSettings,
    /// Reference cache settings
    pub cache: CacheSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Query API configuration.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL of the query API
    pub base_url: String,
    /// Attempt ceiling for reference data endpoints
    pub reference_attempts: u32,
    /// Delay between reference data attempts
    pub reference_retry_delay: Duration,
    /// Attempt ceiling for a route query
    pub poll_attempts: u32,
    /// Interval between route query attempts
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reference_attempts: REFERENCE_FETCH_ATTEMPTS,
            reference_retry_delay: REFERENCE_RETRY_DELAY,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Reference cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Directory for the persisted key-value store
    pub directory: PathBuf,
    /// Validity policy for cached reference data
    pub validity: ValidityPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".flightatlas/cache"),
            validity: ValidityPolicy::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: String,
    /// Log filename
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file: "flightatlas.log".to_string(),
        }
    }
}
