//! `RetroCam` - a retro instant camera
//!
//! Shows a film through one of six era presets, and on a shutter press runs
//! the flash, print and develop sequence before offering the developed print
//! for saving as a PNG card.
//!
//! The `CameraController` owns all state and is driven by a single event
//! loop; the `PrintSequencer` takes explicit instants so the whole lifecycle
//! is testable without sleeping, and exports run on a worker thread guarded
//! by a busy flag.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod preset;
pub mod sequencer;
pub mod source;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use error::{RetroCamError, Result};
