//! User configuration loaded from a TOML file.
//!
//! A missing file is not an error: every key has a default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::utils::environment::home_dir;
use crate::utils::expand_tilde;

pub const DEFAULT_DATABASE_PATH: &str = "~/.dirhist.db";
pub const DEFAULT_CURRENT_DIRECTORY_HISTORY_LIMIT: usize = 5;

/// Written by `dirhist init` when no config exists yet
pub const DEFAULT_CONFIG_CONTENT: &str = r#"# Path to the SQLite database file
database_path = "~/.dirhist.db"

# Commands from the current directory listed first by `dirhist history`
current_directory_history_limit = 5
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory could not be determined")]
    NoHomeDirectory,
    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file; a leading `~/` is expanded on load
    pub database_path: PathBuf,
    pub current_directory_history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            current_directory_history_limit: DEFAULT_CURRENT_DIRECTORY_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// `~/.config/dirhist/dirhist.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(".config").join("dirhist").join("dirhist.toml"))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        Ok(config.expanded())
    }

    /// Parse TOML content without expanding paths
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn expanded(mut self) -> Self {
        if let Some(raw) = self.database_path.to_str() {
            self.database_path = expand_tilde(raw);
        }
        self
    }
}
