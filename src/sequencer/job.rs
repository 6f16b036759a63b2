//! Print jobs and their lifecycle states

use crate::preset::FilterPreset;
use crate::source::ImageRef;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Identifier of a print, increasing by one for every print that starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct JobId(u64);

impl JobId {
    /// Identifier before any print has started
    pub const NONE: Self = Self(0);

    /// Wrap a raw identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw number
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the print is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintState {
    /// No print visible
    #[default]
    Idle,
    /// Print emerging from the slot, not yet savable
    Printing,
    /// Print fully visible and savable
    Developed,
}

impl fmt::Display for PrintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Printing => "printing",
            Self::Developed => "developed",
        })
    }
}

/// What the camera saw at the instant the shutter was pressed
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Active preset at the press
    pub preset: FilterPreset,
    /// Current film at the press
    pub image: Arc<ImageRef>,
    /// When the shutter was pressed
    pub pressed_at: Instant,
}

/// One print, from emerging to developed
///
/// The captured preset and film never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintJob {
    id: JobId,
    state: PrintState,
    capture: Capture,
    printing_since: Instant,
    developed_at: Option<Instant>,
}

impl PrintJob {
    /// A print that started emerging at `printing_since`
    pub fn new(id: JobId, capture: Capture, printing_since: Instant) -> Self {
        Self {
            id,
            state: PrintState::Printing,
            capture,
            printing_since,
            developed_at: None,
        }
    }

    /// The print's identifier
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Lifecycle state
    pub fn state(&self) -> PrintState {
        self.state
    }

    /// Preset that was active when the shutter was pressed
    pub fn preset_at_capture(&self) -> FilterPreset {
        self.capture.preset
    }

    /// Film that was loaded when the shutter was pressed
    pub fn source_image_at_capture(&self) -> &Arc<ImageRef> {
        &self.capture.image
    }

    /// The full capture snapshot
    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// When the shutter was pressed for this print
    pub fn pressed_at(&self) -> Instant {
        self.capture.pressed_at
    }

    /// When the print started emerging
    pub fn printing_since(&self) -> Instant {
        self.printing_since
    }

    /// When the print finished developing
    pub fn developed_at(&self) -> Option<Instant> {
        self.developed_at
    }

    /// Move a `Printing` job to `Developed`
    ///
    /// Returns `false` (and changes nothing) for any other state.
    pub(crate) fn develop(&mut self, at: Instant) -> bool {
        if self.state != PrintState::Printing {
            return false;
        }
        self.state = PrintState::Developed;
        self.developed_at = Some(at);
        true
    }
}
