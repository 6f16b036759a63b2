//! Camera controller module
//!
//! This module owns all camera state and drives it from a single event loop.
//!
//! # Overview
//!
//! The camera controller is the central coordinator that:
//! - **Receives commands** from the front-end (preset, film, shutter, save)
//! - **Fires timers** of the print sequencer when they come due
//! - **Collects export outcomes** from the export worker
//! - **Publishes state snapshots** to the front-end for display
//!
//! # Architecture
//!
//! - `CameraController`: explicit state container owning the selector, film
//!   source, sequencer and exporter
//! - `CameraState`: snapshot sent to the front-end whenever something changed
//! - `CameraCommand`: user actions, parsed from text by the bundled front-end
//!
//! # Event Flow
//!
//! ```text
//! front-end → CameraCommand → CameraController → PrintSequencer
//!                                   ↑    ↓            (timers)
//!                        ExportOutcome  CameraState → front-end
//! ```
//!
//! # Timing
//!
//! The loop sleeps in `recv_timeout` until either a command arrives or the
//! sequencer's next deadline is reached, capped at the idle poll interval so
//! export outcomes are picked up promptly.

pub mod camera_controller;
pub mod command;

pub use camera_controller::{CameraController, CameraState, ViewfinderStatus};
pub use command::CameraCommand;
