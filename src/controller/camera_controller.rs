//! Camera controller implementation
//!
//! This module implements the controller that owns all camera state and
//! coordinates the selector, film source, print sequencer and exporter.

use crate::config::CameraConfig;
use crate::controller::CameraCommand;
use crate::error::{RetroCamError, Result, get_user_friendly_error};
use crate::export::{ExportOutcome, Exporter, FileSaver, PrintRenderer, PrintSnapshot};
use crate::preset::{FilterPreset, FilterSelector};
use crate::sequencer::{JobId, PrintSequencer, PrintState, SequencerEvent, ShutterOutcome};
use crate::source::ImageSource;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError, TrySendError};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, error, info, warn};

/// Status line shown in the viewfinder corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewfinderStatus {
    /// Shutter can be pressed
    Ready,
    /// A print is emerging
    Busy,
}

impl fmt::Display for ViewfinderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "READY",
            Self::Busy => "BUSY",
        })
    }
}

/// Camera state for front-end updates
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Preset shown in the viewfinder
    pub active_preset: FilterPreset,
    /// Current film, as text
    pub film: String,
    /// Whether the flash is lit
    pub flashing: bool,
    /// Lifecycle state of the displayed print
    pub print_state: PrintState,
    /// Displayed print, if any
    pub job_id: Option<JobId>,
    /// Preset the displayed print was shot with
    pub print_preset: Option<FilterPreset>,
    /// Whether the shutter button accepts presses
    pub shutter_enabled: bool,
    /// Whether the save button accepts presses
    pub save_enabled: bool,
    /// Whether an export is in flight
    pub exporting: bool,
    /// READY / BUSY indicator
    pub viewfinder: ViewfinderStatus,
    /// Most recent user-facing notice (failed save, bad film, ...)
    pub last_notice: Option<String>,
    /// Where the most recent successful save went
    pub last_saved: Option<PathBuf>,
}

/// Camera logic controller
pub struct CameraController {
    config: CameraConfig,
    selector: FilterSelector,
    source: ImageSource,
    sequencer: PrintSequencer,
    exporter: Exporter,
    /// Export outcomes (taken when the event loop starts)
    export_receiver: Option<mpsc::Receiver<ExportOutcome>>,
    /// Commands from the front-end (taken when the event loop starts)
    command_receiver: Option<mpsc::Receiver<CameraCommand>>,
    /// State sender to the front-end
    state_sender: mpsc::SyncSender<CameraState>,
    last_published: Option<CameraState>,
    last_notice: Option<String>,
    last_saved: Option<PathBuf>,
}

impl CameraController {
    /// Create a controller from a validated configuration
    pub fn new(
        config: CameraConfig,
        command_receiver: mpsc::Receiver<CameraCommand>,
        state_sender: mpsc::SyncSender<CameraState>,
        renderer: Arc<dyn PrintRenderer>,
        saver: Arc<dyn FileSaver>,
    ) -> Result<Self> {
        config.validate()?;

        let (exporter, export_receiver) = Exporter::new(renderer, saver);
        info!(
            "Camera ready (film mode: {}, develop: {}ms)",
            config.default_preset, config.timings.develop_ms
        );

        Ok(Self {
            selector: FilterSelector::new(config.default_preset),
            source: ImageSource::new(config.default_image_url.clone()),
            sequencer: PrintSequencer::new(config.timings),
            exporter,
            export_receiver: Some(export_receiver),
            command_receiver: Some(command_receiver),
            state_sender,
            last_published: None,
            last_notice: None,
            last_saved: None,
            config,
        })
    }

    /// The configuration the controller runs with
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// The print sequencer, for inspection
    pub fn sequencer(&self) -> &PrintSequencer {
        &self.sequencer
    }

    /// Snapshot of everything the front-end displays
    pub fn state(&self) -> CameraState {
        let print_state = self.sequencer.state();
        let job = self.sequencer.current_job();
        let exporting = self.exporter.is_busy();

        CameraState {
            active_preset: self.selector.active(),
            film: self.source.current().to_string(),
            flashing: self.sequencer.is_flashing(),
            print_state,
            job_id: job.map(crate::sequencer::PrintJob::id),
            print_preset: job.map(crate::sequencer::PrintJob::preset_at_capture),
            shutter_enabled: print_state != PrintState::Printing,
            save_enabled: print_state == PrintState::Developed && !exporting,
            exporting,
            viewfinder: if print_state == PrintState::Printing {
                ViewfinderStatus::Busy
            } else {
                ViewfinderStatus::Ready
            },
            last_notice: self.last_notice.clone(),
            last_saved: self.last_saved.clone(),
        }
    }

    /// Apply one command at `now`
    ///
    /// Returns `false` when the command asks the loop to stop.
    pub fn handle_command(&mut self, command: CameraCommand, now: Instant) -> bool {
        debug!("Handling command: {:?}", command);

        match command {
            CameraCommand::SelectPreset(preset) => self.selector.select(preset),
            CameraCommand::LoadImage(path) => {
                if let Err(e) = self.source.load_file(&path) {
                    warn!("Failed to load film: {}", e);
                    self.last_notice = Some(get_user_friendly_error(&e));
                }
            }
            CameraCommand::ResetImage => self.source.clear_custom(),
            CameraCommand::PressShutter => {
                self.press_shutter(now);
            }
            CameraCommand::Save => {
                if let Err(e) = self.save(SystemTime::now()) {
                    // The save button is disabled in these cases
                    debug!("Save ignored: {}", e);
                }
            }
            CameraCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// Press the shutter, snapshotting the active preset and film
    pub fn press_shutter(&mut self, now: Instant) -> ShutterOutcome {
        let outcome =
            self.sequencer
                .press_shutter(now, self.selector.active(), self.source.current());
        if matches!(outcome, ShutterOutcome::Accepted { .. }) {
            self.last_notice = None;
        }
        outcome
    }

    /// Start exporting the displayed print
    ///
    /// Only a `Developed` print with no export in flight can be saved. The
    /// file is named after the preset selected now.
    pub fn save(&mut self, at: SystemTime) -> Result<()> {
        let job = self
            .sequencer
            .current_job()
            .filter(|job| job.state() == PrintState::Developed)
            .ok_or(RetroCamError::NothingToExport)?;
        self.exporter
            .begin(PrintSnapshot::from(job), self.selector.active(), at)
    }

    /// Fire due timers and collect finished exports
    pub fn tick(&mut self, now: Instant) -> Vec<SequencerEvent> {
        let events = self.sequencer.advance(now);
        self.drain_export_outcomes();
        events
    }

    /// Publish the current state if it differs from the last one sent
    pub fn publish_state(&mut self) {
        let state = self.state();
        if self.last_published.as_ref() == Some(&state) {
            return;
        }

        match self.state_sender.try_send(state.clone()) {
            Ok(()) => {
                debug!(
                    "Sent state update: {} / {}",
                    state.print_state, state.active_preset
                );
                self.last_published = Some(state);
            }
            Err(TrySendError::Full(_)) => {
                // Retried on the next loop iteration since last_published is unchanged
                warn!("Front-end is not keeping up; state update deferred");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("Front-end state receiver disconnected");
            }
        }
    }

    /// How long the loop may sleep before the next timer is due
    fn wait_budget(&self, now: Instant) -> Duration {
        let idle = self.config.idle_poll();
        self.sequencer
            .next_deadline()
            .map_or(idle, |deadline| deadline.saturating_duration_since(now).min(idle))
    }

    fn drain_export_outcomes(&mut self) {
        let Some(receiver) = self.export_receiver.as_ref() else {
            return;
        };
        let mut outcomes = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        for outcome in outcomes {
            self.handle_export_outcome(outcome);
        }
    }

    fn handle_export_outcome(&mut self, outcome: ExportOutcome) {
        match outcome.result {
            Ok(path) => {
                info!("Print {} saved to {}", outcome.job_id, path.display());
                self.last_saved = Some(path);
                self.last_notice = None;
            }
            Err(e) => {
                error!("Failed to save print {} as {}: {}", outcome.job_id, outcome.filename, e);
                self.last_notice = Some(get_user_friendly_error(&e));
            }
        }
    }

    /// Run the event loop on the current thread until shutdown or disconnect
    pub fn run(&mut self) {
        let Some(command_receiver) = self.command_receiver.take() else {
            warn!("Event loop already running; run() call ignored");
            return;
        };

        info!("Entering camera event loop");
        self.publish_state();
        loop {
            let budget = self.wait_budget(Instant::now());
            if !self.step(command_receiver.recv_timeout(budget)) {
                break;
            }
        }
        info!("Camera event loop exited");
    }

    /// One event loop iteration: apply what was received, fire timers, publish
    ///
    /// Returns `false` when the loop should exit.
    fn step(&mut self, received: std::result::Result<CameraCommand, RecvTimeoutError>) -> bool {
        match received {
            Ok(command) => {
                if !self.handle_command(command, Instant::now()) {
                    return false;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Command channel disconnected. Exiting event loop.");
                return false;
            }
        }
        self.tick(Instant::now());
        self.publish_state();
        true
    }

    /// Spawn the event loop in a background thread
    ///
    /// The controller is locked only while handling a command or a tick, so
    /// the front-end can read `state()` between iterations.
    pub fn spawn_event_loop(
        controller: Arc<Mutex<CameraController>>,
    ) -> Result<std::thread::JoinHandle<()>> {
        let command_receiver = controller
            .lock()
            .command_receiver
            .take()
            .ok_or_else(|| {
                RetroCamError::ConfigError(crate::error::StringError::new(
                    "camera event loop already running",
                ))
            })?;

        let handle = std::thread::Builder::new()
            .name("retrocam-controller".to_string())
            .spawn(move || {
                info!("Entering camera event loop");
                controller.lock().publish_state();
                loop {
                    let budget = controller.lock().wait_budget(Instant::now());
                    // Unlocked while waiting so the front-end can read state
                    let received = command_receiver.recv_timeout(budget);
                    if !controller.lock().step(received) {
                        break;
                    }
                }
                info!("Camera event loop exited");
            })?;
        Ok(handle)
    }
}
