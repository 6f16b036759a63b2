//! Busy-guarded export worker

use crate::error::{RetroCamError, Result};
use crate::export::{FileSaver, PrintRenderer};
use crate::preset::FilterPreset;
use crate::sequencer::{JobId, PrintJob};
use crate::source::ImageRef;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

/// Everything needed to render a print, detached from the live job
#[derive(Debug, Clone, PartialEq)]
pub struct PrintSnapshot {
    /// Print being exported
    pub job_id: JobId,
    /// Preset the print was shot with
    pub preset: FilterPreset,
    /// Film the print was shot on
    pub image: Arc<ImageRef>,
}

impl From<&PrintJob> for PrintSnapshot {
    fn from(job: &PrintJob) -> Self {
        Self {
            job_id: job.id(),
            preset: job.preset_at_capture(),
            image: Arc::clone(job.source_image_at_capture()),
        }
    }
}

/// Result of one export, reported back to the controller
#[derive(Debug)]
pub struct ExportOutcome {
    /// Print that was exported
    pub job_id: JobId,
    /// File name offered to the saver
    pub filename: String,
    /// Where the file was saved, or why it failed
    pub result: Result<PathBuf>,
}

/// File name for a print: `retrocam-{preset}-{unix millis}.png`
pub fn export_filename(preset: FilterPreset, at: SystemTime) -> String {
    let millis = at
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("retrocam-{}-{millis}.png", preset.identifier())
}

/// Clears the busy flag when the worker finishes, even by panic
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs exports off the caller's thread, one at a time
pub struct Exporter {
    renderer: Arc<dyn PrintRenderer>,
    saver: Arc<dyn FileSaver>,
    busy: Arc<AtomicBool>,
    outcome_sender: mpsc::Sender<ExportOutcome>,
}

impl Exporter {
    /// Create an exporter and the receiver its outcomes arrive on
    pub fn new(
        renderer: Arc<dyn PrintRenderer>,
        saver: Arc<dyn FileSaver>,
    ) -> (Self, mpsc::Receiver<ExportOutcome>) {
        let (outcome_sender, outcome_receiver) = mpsc::channel();
        (
            Self {
                renderer,
                saver,
                busy: Arc::new(AtomicBool::new(false)),
                outcome_sender,
            },
            outcome_receiver,
        )
    }

    /// Whether an export is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start exporting `print` on a worker thread
    ///
    /// The file is named after `active`, the preset selected when saving.
    /// Returns `ExportBusy` without doing anything if an export is already
    /// running. The outcome is delivered on the receiver from [`Exporter::new`].
    pub fn begin(&self, print: PrintSnapshot, active: FilterPreset, at: SystemTime) -> Result<()> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Export requested while another is in flight");
            return Err(RetroCamError::ExportBusy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let filename = export_filename(active, at);
        info!("Exporting print {} as {}", print.job_id, filename);

        let renderer = Arc::clone(&self.renderer);
        let saver = Arc::clone(&self.saver);
        let sender = self.outcome_sender.clone();

        let spawned = std::thread::Builder::new()
            .name("retrocam-export".to_string())
            .spawn(move || {
                let result = run_export(renderer.as_ref(), saver.as_ref(), &print, &filename);
                // Busy must read false before the outcome is observable
                drop(guard);
                if sender
                    .send(ExportOutcome {
                        job_id: print.job_id,
                        filename,
                        result,
                    })
                    .is_err()
                {
                    debug!("Export outcome receiver dropped");
                }
            });

        spawned.map(|_| ()).map_err(|e| {
            // The closure (and the guard inside it) was dropped, so busy is clear
            error!("Failed to start export worker: {e}");
            RetroCamError::IoError(e)
        })
    }

    /// Export `print` on the calling thread
    ///
    /// Same busy rules as [`Exporter::begin`]; useful where no event loop runs.
    pub fn export_blocking(
        &self,
        print: &PrintSnapshot,
        active: FilterPreset,
        at: SystemTime,
    ) -> Result<PathBuf> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RetroCamError::ExportBusy);
        }
        let _guard = BusyGuard(Arc::clone(&self.busy));
        let filename = export_filename(active, at);
        run_export(self.renderer.as_ref(), self.saver.as_ref(), print, &filename)
    }
}

fn run_export(
    renderer: &dyn PrintRenderer,
    saver: &dyn FileSaver,
    print: &PrintSnapshot,
    filename: &str,
) -> Result<PathBuf> {
    let png = renderer.render(print)?;
    saver.save(filename, &png)
}
