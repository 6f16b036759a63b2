//! Configuration data models
//!
//! This module defines the data structures used for camera configuration.
//! Every section has defaults so a partial `config.json` still loads.

use crate::error::{RetroCamError, Result, StringError};
use crate::preset::FilterPreset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default film loaded into the camera when the user has not picked a file
pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df?q=80&w=2613&auto=format&fit=crop";

/// Largest accepted `export.scale`
pub const MAX_EXPORT_SCALE: u32 = 8;

/// Largest accepted `export.print_size`, in pixels
pub const MAX_PRINT_SIZE: u32 = 4096;

/// Top-level camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Print lifecycle timing
    pub timings: SequencerTimings,
    /// Remote image shown in the viewfinder until a local film is loaded
    pub default_image_url: String,
    /// Preset active when the camera starts
    pub default_preset: FilterPreset,
    /// Export (save to device) settings
    pub export: ExportSettings,
    /// Longest the controller sleeps when no timer is pending, in milliseconds
    pub idle_poll_ms: u64,
}

/// Delays driving the shutter -> flash -> print -> develop sequence
///
/// All values are milliseconds measured from the shutter press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerTimings {
    /// How long the flash stays lit
    pub flash_ms: u64,
    /// Delay before the new print starts emerging
    pub print_delay_ms: u64,
    /// Delay before the print is fully developed
    pub develop_ms: u64,
}

/// Settings for rendering and writing exported prints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Pixel multiplier applied to the whole print card
    pub scale: u32,
    /// Edge length of the square photo area at scale 1, in pixels
    pub print_size: u32,
    /// Card background colour (RGB)
    pub background: [u8; 3],
    /// Directory the saved prints are written to
    pub downloads_dir: PathBuf,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            timings: SequencerTimings::default(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            default_preset: FilterPreset::Koda,
            export: ExportSettings::default(),
            idle_poll_ms: 100,
        }
    }
}

impl Default for SequencerTimings {
    fn default() -> Self {
        Self {
            flash_ms: 200,
            print_delay_ms: 50,
            develop_ms: 4500,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2,
            print_size: 200,
            background: [0xee, 0xee, 0xee],
            downloads_dir: PathBuf::from("downloads"),
        }
    }
}

impl SequencerTimings {
    /// Check that the delays keep the lifecycle ordering
    ///
    /// The flash must clear after a non-zero delay and the print must start
    /// emerging strictly before it develops.
    pub fn validate(&self) -> Result<()> {
        if self.flash_ms == 0 {
            return Err(RetroCamError::ConfigError(StringError::new(
                "flash_ms must be greater than zero",
            )));
        }
        if self.print_delay_ms >= self.develop_ms {
            return Err(RetroCamError::ConfigError(StringError::new(format!(
                "print_delay_ms ({}) must be less than develop_ms ({})",
                self.print_delay_ms, self.develop_ms
            ))));
        }
        Ok(())
    }

    /// Flash duration
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    /// Delay from shutter press to the print starting to emerge
    pub fn print_delay(&self) -> Duration {
        Duration::from_millis(self.print_delay_ms)
    }

    /// Delay from shutter press to the print being developed
    pub fn develop(&self) -> Duration {
        Duration::from_millis(self.develop_ms)
    }
}

impl CameraConfig {
    /// Validate every section of the configuration
    pub fn validate(&self) -> Result<()> {
        self.timings.validate()?;
        let export = &self.export;
        if !(1..=MAX_EXPORT_SCALE).contains(&export.scale) {
            return Err(RetroCamError::ConfigError(StringError::new(format!(
                "export scale ({}) must be between 1 and {MAX_EXPORT_SCALE}",
                export.scale
            ))));
        }
        if !(1..=MAX_PRINT_SIZE).contains(&export.print_size) {
            return Err(RetroCamError::ConfigError(StringError::new(format!(
                "export print_size ({}) must be between 1 and {MAX_PRINT_SIZE}",
                export.print_size
            ))));
        }
        Ok(())
    }

    /// Idle poll interval of the controller loop
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms.max(1))
    }
}
