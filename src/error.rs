//! Error types for `RetroCam`
//!
//! This module defines all error types used throughout the camera,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains so the log
//! shows the root cause while the user only sees a short notice.

use std::path::PathBuf;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `RetroCam`
#[derive(Debug, Error)]
pub enum RetroCamError {
    /// Preset identifier is not one of the known presets
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Front-end command could not be understood
    #[error("Unrecognised command: {0}")]
    UnknownCommand(String),

    /// A film file chosen by the user could not be used
    #[error("Cannot load film from {path}: {reason}")]
    InvalidFilm {
        /// Path that was offered
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// Fetching the source image bytes failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Failed to fetch source image: {0}")]
    ImageFetchFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Rendering the print to a bitmap failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Failed to render print: {0}")]
    RenderFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Handing the encoded print to the file saver failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Failed to save print: {0}")]
    SaveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An export is already in flight
    #[error("An export is already in progress")]
    ExportBusy,

    /// No developed print is available to export
    #[error("No developed print to save")]
    NothingToExport,

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Image decoding/encoding error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Result type alias for `RetroCam` operations
pub type Result<T> = std::result::Result<T, RetroCamError>;

/// Convert an error to a user-friendly message
///
/// Returns the notice shown to the user. Export failures all read as a
/// failed save so the front-end can show them as a single kind of alert.
pub fn get_user_friendly_error(error: &RetroCamError) -> String {
    match error {
        RetroCamError::UnknownPreset(name) => {
            format!(
                "There is no \"{name}\" film mode.\n\n\
                 Available modes: noir, koda, retro, sepia, neon, cyber."
            )
        }
        RetroCamError::UnknownCommand(line) => {
            format!(
                "Unrecognised command: {line}\n\n\
                 Try: preset <mode>, load <file>, reset, shutter, save, status, quit."
            )
        }
        RetroCamError::InvalidFilm { path, reason } => {
            format!(
                "Could not load film from {}:\n\n{reason}\n\n\
                 Please choose an image file.",
                path.display()
            )
        }
        RetroCamError::ImageFetchFailed(_) => "Could not save image. \
             The source image could not be read.\n\n\
             Remote images may be blocked or unreachable; try loading a local film."
            .to_string(),
        RetroCamError::RenderFailed(_) | RetroCamError::ImageError(_) => {
            "Could not save image. The print could not be rendered.".to_string()
        }
        RetroCamError::SaveFailed(_) => "Could not save image. \
             Writing the file was not permitted.\n\n\
             Check that the downloads folder exists and is writable."
            .to_string(),
        RetroCamError::ExportBusy => "Still saving the previous print.".to_string(),
        RetroCamError::NothingToExport => {
            "Wait for the print to develop before saving it.".to_string()
        }
        RetroCamError::ConfigError(_) => "Failed to load configuration.\n\n\
             The camera will use default settings."
            .to_string(),
        RetroCamError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        RetroCamError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The camera will use default settings."
            )
        }
    }
}
