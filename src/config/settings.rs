//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Default backing file name, looked up in the working directory
pub const DEFAULT_STORE_FILE: &str = "quotes.db.json";

/// Quote stored by `set` when none is given
pub const DEFAULT_QUOTE: &str = "Lorem Ipsum";

/// Prefix for environment overrides (`RANDQUOTE_STORE_FILE`, etc.)
pub const ENV_PREFIX: &str = "RANDQUOTE_";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing file for the quote collection. Relative paths resolve
    /// against the current working directory.
    pub store_file: PathBuf,

    /// Quote text used by `set` when the quote argument is omitted
    pub default_quote: String,

    /// Hold an exclusive advisory lock on the backing file while a command runs
    pub lock: bool,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (if set, logs to file instead of stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: PathBuf::from(DEFAULT_STORE_FILE),
            default_quote: DEFAULT_QUOTE.to_string(),
            lock: true,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default config file and the environment
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration layered on top of a specific config file.
    ///
    /// A missing file is skipped rather than treated as an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the backing file against the current working directory
    pub fn store_path(&self) -> Result<PathBuf> {
        if self.store_file.is_absolute() {
            return Ok(self.store_file.clone());
        }
        Ok(std::env::current_dir()?.join(&self.store_file))
    }

    /// Save current configuration to the given file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "randquote", "randquote").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}
