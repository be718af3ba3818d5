//! Runtime configuration resolved once at startup. Everything has a sensible
//! default so the binary runs without any setup; environment variables exist
//! for tests and for people who keep their data somewhere else.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".lyrical-float";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "lyrical-float.sqlite";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "lyrical-float.log";

/// Overrides the data directory.
pub const HOME_ENV: &str = "LYRICAL_FLOAT_HOME";
/// Overrides the directory the import picker opens in.
pub const IMPORT_DIR_ENV: &str = "LYRICAL_FLOAT_IMPORT_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database and the log file.
    pub data_dir: PathBuf,
    /// Directory the import picker starts in.
    pub import_dir: PathBuf,
}

impl Config {
    /// Resolve the configuration from the environment, falling back to the
    /// user's home directory and the current working directory.
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        let import_dir = match env::var_os(IMPORT_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => env::current_dir().context("failed to resolve current directory")?,
        };

        Ok(Self {
            data_dir,
            import_dir,
        })
    }

    /// Build a configuration rooted in an explicit directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>, import_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            import_dir: import_dir.into(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_inside_data_dir() {
        let config = Config::with_data_dir("/tmp/lf", "/tmp/import");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/lf/lyrical-float.sqlite"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/lf/lyrical-float.log"));
        assert_eq!(config.import_dir, PathBuf::from("/tmp/import"));
    }
}
