//! Configuration management module
//!
//! This module handles loading, saving, and validating camera configuration.
//! Configuration is stored in `$RETROCAM_HOME/config.json` with atomic writes
//! to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{CameraConfig, ExportSettings, SequencerTimings};
