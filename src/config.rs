//! User configuration, read from `~/.config/postform/config.toml`.
//!
//! Every key is optional:
//!
//! ```toml
//! data_dir = "/home/ada/posts"
//! log_level = "debug"
//!
//! [user]
//! id = "ada"
//! name = "Ada Lovelace"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::User;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "POSTFORM_DATA_DIR";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The user posts are created as.
    pub user: User,
    /// Where posts and images are stored.
    pub data_dir: Option<PathBuf>,
    /// Default log filter when `POSTFORM_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: User::default(),
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the config from the platform config directory.
    ///
    /// A missing file, or a platform without a config directory, yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match dirs::config_dir() {
            Some(dir) => Self::from_path(&dir.join("postform").join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads the config from `path`, falling back to defaults if it does not exist.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parses config TOML.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Resolves the data directory: `$POSTFORM_DATA_DIR`, then `data_dir`,
    /// then `~/.local/share/postform`.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.data_dir_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn data_dir_with(&self, env_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = env_override.or_else(|| self.data_dir.clone()) {
            return Ok(dir);
        }
        dirs::data_dir()
            .map(|dir| dir.join("postform"))
            .ok_or(ConfigError::NoDataDir)
    }
}
