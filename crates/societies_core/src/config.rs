//! Host-supplied configuration for opening a store.
//!
//! # Invariants
//! - Every field except `db_dir` has a default, so a minimal document only
//!   names the directory.
//! - Logging is opt-in; `None` leaves the process logger untouched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schema::DB_NAME;

const DEFAULT_MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

/// Where the social database lives and how the core should log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub db_dir: PathBuf,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl StoreConfig {
    pub fn new(db_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_dir: db_dir.into(),
            db_name: default_db_name(),
            logging: None,
        }
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(&self.db_name)
    }
}

/// Rolling file log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for log files.
    pub log_dir: PathBuf,
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl LoggingConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_level(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_MAX_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

fn default_db_name() -> String {
    DB_NAME.to_string()
}

fn default_level() -> String {
    crate::logging::default_log_level().to_string()
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_LOG_FILE_SIZE_BYTES
}

fn default_max_files() -> usize {
    DEFAULT_MAX_LOG_FILES
}

#[cfg(test)]
mod tests {
    use super::{LoggingConfig, StoreConfig};
    use std::path::PathBuf;

    #[test]
    fn db_path_joins_dir_and_default_name() {
        let config = StoreConfig::new("/data/app");
        assert_eq!(config.db_path(), PathBuf::from("/data/app/societies.db"));
    }

    #[test]
    fn logging_defaults_match_rotation_policy() {
        let config = LoggingConfig::new("/var/log/societies");
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_files, 5);
    }
}
