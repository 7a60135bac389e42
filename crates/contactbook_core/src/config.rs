//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect logging and data-source settings from defaults and environment.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; invalid values surface when they are used
//!   (e.g. by `init_logging`).

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Overrides the log level (`trace|debug|info|warn|error`).
pub const ENV_LOG_LEVEL: &str = "CONTACTBOOK_LOG_LEVEL";
/// Absolute directory for rolling log files. Logging stays off when unset.
pub const ENV_LOG_DIR: &str = "CONTACTBOOK_LOG_DIR";
/// Path of the contacts JSON document loaded at startup.
pub const ENV_DATA_PATH: &str = "CONTACTBOOK_DATA_PATH";

/// Settings shared by every front end of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            data_path: None,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let defaults = Self::default();
        Self {
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
            data_path: value(ENV_DATA_PATH).map(PathBuf::from),
        }
    }
}
