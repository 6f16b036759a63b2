//! Shutter -> flash -> print -> develop sequencing

use crate::config::SequencerTimings;
use crate::preset::FilterPreset;
use crate::sequencer::job::{Capture, JobId, PrintJob, PrintState};
use crate::sequencer::timers::{TimerQueue, TimerTask};
use crate::source::ImageRef;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a shutter press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterOutcome {
    /// A print is emerging; the press had no effect
    Ignored,
    /// The press started a new cycle
    Accepted {
        /// Print that was on display and got retired, if any
        retired: Option<JobId>,
    },
}

/// Something visible that happened while firing timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// The flash went dark
    FlashCleared,
    /// A new print started emerging
    PrintStarted(JobId),
    /// A print finished developing
    Developed(JobId),
}

/// Owns the print lifecycle and its pending timers
#[derive(Debug)]
pub struct PrintSequencer {
    timings: SequencerTimings,
    timers: TimerQueue,
    current: Option<PrintJob>,
    last_job_id: JobId,
    /// Bumped on every accepted press; timers from older presses are stale
    generation: u64,
    flashing: bool,
}

impl PrintSequencer {
    /// Create an idle sequencer
    pub fn new(timings: SequencerTimings) -> Self {
        Self {
            timings,
            timers: TimerQueue::new(),
            current: None,
            last_job_id: JobId::NONE,
            generation: 0,
            flashing: false,
        }
    }

    /// Lifecycle state of the displayed print
    pub fn state(&self) -> PrintState {
        self.current.as_ref().map_or(PrintState::Idle, PrintJob::state)
    }

    /// The displayed print, if any
    pub fn current_job(&self) -> Option<&PrintJob> {
        self.current.as_ref()
    }

    /// Identifier of the most recent print that started
    pub fn last_job_id(&self) -> JobId {
        self.last_job_id
    }

    /// Whether the flash is lit
    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    /// Whether the displayed print may be saved
    pub fn is_developed(&self) -> bool {
        self.state() == PrintState::Developed
    }

    /// The timing this sequencer runs with
    pub fn timings(&self) -> &SequencerTimings {
        &self.timings
    }

    /// When the next pending timer fires
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Pending timers, for inspection
    pub fn pending(&self) -> &TimerQueue {
        &self.timers
    }

    /// Handle a shutter press at `now`
    ///
    /// `preset` and `image` are the selector and film state at the instant of
    /// the press; the print keeps them even if they change later.
    pub fn press_shutter(
        &mut self,
        now: Instant,
        preset: FilterPreset,
        image: Arc<ImageRef>,
    ) -> ShutterOutcome {
        if self.state() == PrintState::Printing {
            debug!("Shutter pressed while printing, ignored");
            return ShutterOutcome::Ignored;
        }

        self.generation += 1;
        let generation = self.generation;

        self.flashing = true;
        self.timers.schedule(
            now + self.timings.flash(),
            TimerTask::ClearFlash { generation },
        );

        let retired = self.current.take().map(|job| job.id());
        if let Some(id) = retired {
            debug!("Retired print {}", id);
        }

        self.timers.schedule(
            now + self.timings.print_delay(),
            TimerTask::StartPrint {
                generation,
                capture: Capture {
                    preset,
                    image,
                    pressed_at: now,
                },
            },
        );

        info!("Shutter pressed (film mode: {})", preset);
        ShutterOutcome::Accepted { retired }
    }

    /// Fire every timer due at or before `now`, in due order
    ///
    /// Transitions are stamped with the timer's due time, not `now`, so a
    /// late call produces the same history as a punctual one.
    pub fn advance(&mut self, now: Instant) -> Vec<SequencerEvent> {
        let mut events = Vec::new();

        while let Some((due, task)) = self.timers.pop_due(now) {
            match task {
                TimerTask::ClearFlash { generation } => {
                    if generation == self.generation && self.flashing {
                        self.flashing = false;
                        events.push(SequencerEvent::FlashCleared);
                    } else {
                        debug!("Flash timer from press {} is stale", generation);
                    }
                }
                TimerTask::StartPrint {
                    generation,
                    capture,
                } => {
                    if generation != self.generation {
                        debug!("Print for press {} superseded before it started", generation);
                        continue;
                    }
                    let id = self.last_job_id.next();
                    self.last_job_id = id;
                    self.timers.schedule(
                        capture.pressed_at + self.timings.develop(),
                        TimerTask::Develop { job: id },
                    );
                    info!("Print {} emerging ({})", id, capture.preset);
                    self.current = Some(PrintJob::new(id, capture, due));
                    events.push(SequencerEvent::PrintStarted(id));
                }
                TimerTask::Develop { job } => {
                    let developed = self
                        .current
                        .as_mut()
                        .is_some_and(|current| current.id() == job && current.develop(due));
                    if developed {
                        info!("Print {} developed", job);
                        events.push(SequencerEvent::Developed(job));
                    } else {
                        debug!("Develop timer for print {} is stale", job);
                    }
                }
            }
        }

        events
    }
}

impl Default for PrintSequencer {
    fn default() -> Self {
        Self::new(SequencerTimings::default())
    }
}
