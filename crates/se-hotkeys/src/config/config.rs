//! Application configuration for se-hotkeys.
//!
//! Handles loading and saving the TOML configuration file with
//! cross-platform paths and atomic write operations. Sound bindings live in
//! their own file, see [`ConfigStore`](crate::config::ConfigStore).

use crate::{
    AppError, AppResult,
    config::{PlaybackConfig, ServerConfig, project_dirs, write_atomic},
};

use std::{fs, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Embedded settings server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Playback settings.
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::parse(&contents)?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Parse configuration from TOML text. Missing sections use defaults.
    ///
    /// TOML accepts `nan` and `inf` as floats, so the volume is checked here.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !config.playback.volume.is_finite() {
            return Err(AppError::ConfigError {
                reason: format!("Volume must be a number, got {}", config.playback.volume),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(config)
    }

    /// Save configuration to disk using atomic write pattern.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(&config_path, contents.as_bytes()).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to write config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Get the settings server base URL for opening in the browser.
    pub fn settings_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.server.port)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }
}
