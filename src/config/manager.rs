//! Configuration manager for loading and saving camera configuration
//!
//! This module provides functionality to load and save configuration to
//! `$RETROCAM_HOME/config.json` with atomic writes to prevent corruption.

use crate::config::models::CameraConfig;
use crate::error::{RetroCamError, Result, StringError};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming the camera's data directory
pub const HOME_ENV_VAR: &str = "RETROCAM_HOME";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the camera's data directory
    ///
    /// Returns `$RETROCAM_HOME`, or the working directory when unset.
    pub fn get_data_dir() -> PathBuf {
        std::env::var_os(HOME_ENV_VAR).map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    /// Get the path to the configuration file
    ///
    /// Returns: `$RETROCAM_HOME/config.json`
    pub fn get_config_path() -> PathBuf {
        Self::get_data_dir().join("config.json")
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, is corrupt or fails validation,
    /// returns default configuration.
    pub fn load() -> Result<CameraConfig> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(CameraConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        match serde_json::from_str::<CameraConfig>(&json) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    info!("Configuration loaded successfully");
                    Ok(config)
                }
                Err(e) => {
                    warn!("Configuration rejected, using defaults: {}", e);
                    Ok(CameraConfig::default())
                }
            },
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(CameraConfig::default())
            }
        }
    }

    /// Save configuration to disk with atomic write
    ///
    /// Writes into a temporary file in the same directory, then persists it
    /// over `config.json`.
    pub fn save(config: &CameraConfig) -> Result<()> {
        let config_path = Self::get_config_path();
        let config_dir = config_path
            .parent()
            .ok_or_else(|| RetroCamError::ConfigError(StringError::new("Invalid config path")))?;
        std::fs::create_dir_all(config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        let mut temp = tempfile::NamedTempFile::new_in(config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&config_path)
            .map_err(|e| RetroCamError::IoError(e.error))?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
