//! Print lifecycle state machine
//!
//! # Overview
//!
//! The sequencer turns shutter presses into prints:
//!
//! ```text
//! press ──► flash on ──(flash_ms)──► flash off
//!   │
//!   └─► Idle ──(print_delay_ms)──► Printing ──(develop_ms from press)──► Developed
//! ```
//!
//! # Re-entrancy
//!
//! - A press while a print is `Printing` is ignored: no flash, no new job,
//!   no timers.
//! - Any other press retires the displayed print at once and starts a new
//!   cycle.
//!
//! # Stale timers
//!
//! Delayed transitions are queued tasks rather than closures over shared
//! state. Each task carries the press generation or [`JobId`] it was
//! scheduled for and is dropped at fire time when that no longer matches the
//! current one, so an old timer can never move a newer print.
//!
//! # Time
//!
//! The sequencer never reads the clock. Callers pass `now` into
//! [`PrintSequencer::press_shutter`] and [`PrintSequencer::advance`], which
//! keeps every transition deterministic under test.

pub mod job;
pub mod print_sequencer;
pub mod timers;

pub use job::{Capture, JobId, PrintJob, PrintState};
pub use print_sequencer::{PrintSequencer, SequencerEvent, ShutterOutcome};
pub use timers::{TimerQueue, TimerTask};
