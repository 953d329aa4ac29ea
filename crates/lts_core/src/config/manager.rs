//! Config manager for loading and saving settings.
//!
//! Writes are atomic (temp file in the same directory, then rename) so an
//! interrupted save never leaves a truncated config behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages application configuration.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Default config file location under the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ltc-stamper")
            .map(|dirs| dirs.config_dir().join("ltc-stamper.toml"))
    }

    /// The path this manager reads from and writes to.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Current in-memory settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load settings from the config file.
    pub fn load(&mut self) -> ConfigResult<&Settings> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        let text = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&text)?;
        Ok(&self.settings)
    }

    /// Load settings, writing a default config file if none exists yet.
    pub fn load_or_create(&mut self) -> ConfigResult<&Settings> {
        match self.load() {
            Ok(_) => Ok(&self.settings),
            Err(ConfigError::NotFound(_)) => {
                self.settings = Settings::default();
                self.save()?;
                tracing::info!("wrote default config to {}", self.config_path.display());
                Ok(&self.settings)
            }
            Err(e) => Err(e),
        }
    }

    /// Save current settings atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let text = toml::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.config_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.config_path)?;
        Ok(())
    }
}
