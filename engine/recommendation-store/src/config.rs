//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/cartola.db";

/// Configuration for the recommendation store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file
    pub path: PathBuf,

    /// Open the database in WAL journal mode
    pub wal_mode: bool,

    /// How long a connection waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_DB_PATH), wal_mode: true, busy_timeout_ms: 5_000 }
    }
}

impl StoreConfig {
    /// Create a configuration pointing at `path` with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("database path must not be empty".to_string());
        }
        if self.path.is_dir() {
            return Err(format!("database path {:?} is a directory", self.path));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(config.wal_mode);
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = StoreConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directory_path_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path());
        assert!(config.validate().unwrap_err().contains("directory"));
    }
}
