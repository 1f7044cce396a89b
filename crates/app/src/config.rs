//! Application configuration
//!
//! Optional TOML file, `<config_dir>/config.toml` unless a path is given on
//! the command line. Every field has a default, so a missing file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Could not determine data directory")]
    NoProjectDirs,
}

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_COPIED_INDICATOR_MS: u64 = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite file holding the session record
    pub database_path: Option<PathBuf>,
    /// Directory printed code sheets are written to
    pub print_dir: Option<PathBuf>,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: Option<String>,
    /// How long the "copied" mark stays next to a code
    pub copied_indicator_ms: Option<u64>,
}

impl Config {
    /// Load from an explicit path, or from the default location if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => {
                let path = project_dirs()?.config_dir().join("config.toml");
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("giftdraw.db")),
        }
    }

    pub fn print_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.print_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms.unwrap_or(DEFAULT_COPIED_INDICATOR_MS))
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "onyx", "giftdraw").ok_or(ConfigError::NoProjectDirs)
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}
