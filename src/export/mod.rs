//! Saving developed prints
//!
//! # Overview
//!
//! Exporting is split across two collaborators so either can be replaced:
//!
//! - [`PrintRenderer`]: turns a print snapshot into encoded PNG bytes
//! - [`FileSaver`]: hands `(filename, bytes)` to the user
//!
//! The [`Exporter`] runs both on a worker thread, guarded by a busy flag so a
//! second save cannot start while one is in flight, and reports the outcome
//! back over a channel. Failures never touch the print lifecycle.

pub mod exporter;
pub mod renderer;
pub mod saver;

pub use exporter::{ExportOutcome, Exporter, PrintSnapshot, export_filename};
pub use renderer::{InstantPrintRenderer, PrintRenderer};
pub use saver::{DirectorySaver, FileSaver};
