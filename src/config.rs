//! Filesystem locations used by the application. There is no config file;
//! everything lives in a dot-directory under the user's home.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".biodata-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "biodata.sqlite";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "biodata-manager.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the data directory inside the current user's home.
    pub fn from_home() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Keep every file under `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_the_data_dir() {
        let config = AppConfig::in_dir("/tmp/bio");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/bio/biodata.sqlite"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/bio/biodata-manager.log"));
    }
}
