//! Process configuration for the notes core.
//!
//! # Responsibility
//! - Resolve database path and logging settings.
//! - Read overrides from `JETNOTE_*` environment variables.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Invalid values are reported, never silently replaced by defaults.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "JETNOTE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "JETNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "JETNOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "jetnote_notes.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "jetnote-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DEFAULT_DB_FILE_NAME),
            logging: LoggingConfig {
                level: default_log_level().to_string(),
                log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
            },
        }
    }
}

impl CoreConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// - `InvalidValue` for an unknown log level.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            config.logging.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.logging.level = normalize_level(&level)
                .map_err(|err| ConfigError::InvalidValue {
                    key: LOG_LEVEL_ENV,
                    message: err.to_string(),
                })?
                .to_string();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with(DEFAULT_DB_FILE_NAME));
    }

    #[test]
    fn overrides_are_trimmed_and_blank_values_ignored() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /data/notes.db "),
            (LOG_DIR_ENV, "   "),
            (LOG_LEVEL_ENV, "WARNING"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.logging.log_dir, CoreConfig::default().logging.log_dir);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn invalid_log_level_is_reported_with_its_key() {
        let err = CoreConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == LOG_LEVEL_ENV));
    }
}
