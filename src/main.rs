//! `RetroCam` - a retro instant camera for the terminal
//!
//! Reads one command per line from stdin and prints a line each time the
//! camera state changes. Logs go to `$RETROCAM_HOME/retrocam.log`.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use retrocam::{
    config::{CameraConfig, ConfigManager},
    controller::{CameraCommand, CameraController, CameraState},
    error::get_user_friendly_error,
    export::{DirectorySaver, InstantPrintRenderer},
    source::HttpFilmFetcher,
    utils,
};
use std::io::BufRead;
use std::sync::{Arc, mpsc};
use tracing::{error, info, warn};

const CHANNEL_CAPACITY: usize = 32;

fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    let config = ConfigManager::load().context("Failed to load camera configuration")?;
    if !ConfigManager::get_config_path().exists() {
        // Write the defaults so the timings are discoverable and editable
        if let Err(e) = ConfigManager::save(&config) {
            warn!("Could not write default configuration: {}", e);
        }
    }

    let (command_tx, command_rx) = mpsc::sync_channel::<CameraCommand>(CHANNEL_CAPACITY);
    let (state_tx, state_rx) = mpsc::sync_channel::<CameraState>(CHANNEL_CAPACITY);

    let controller = Arc::new(Mutex::new(
        build_controller(config, command_rx, state_tx).context("Failed to create camera")?,
    ));
    let event_loop = CameraController::spawn_event_loop(Arc::clone(&controller))
        .context("Failed to start camera event loop")?;

    let printer = std::thread::Builder::new()
        .name("retrocam-display".to_string())
        .spawn(move || {
            // Ends when the controller drops its sender
            for state in state_rx {
                println!("{}", describe(&state));
            }
        })
        .context("Failed to start display thread")?;

    print_help();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        let trimmed = line.trim();
        match trimmed {
            "" => {}
            "status" => println!("{}", describe(&controller.lock().state())),
            "help" => print_help(),
            _ => match trimmed.parse::<CameraCommand>() {
                Ok(command) => {
                    let stop = command == CameraCommand::Shutdown;
                    if command_tx.send(command).is_err() {
                        error!("Camera event loop is gone");
                        break;
                    }
                    if stop {
                        break;
                    }
                }
                Err(e) => println!("{}", get_user_friendly_error(&e)),
            },
        }
    }

    // stdin closed without "quit" still stops the loop via disconnection
    drop(command_tx);
    if event_loop.join().is_err() {
        error!("Camera event loop panicked");
    }
    drop(controller);
    if printer.join().is_err() {
        error!("Display thread panicked");
    }

    info!("RetroCam shutting down");
    Ok(())
}

fn build_controller(
    config: CameraConfig,
    command_rx: mpsc::Receiver<CameraCommand>,
    state_tx: mpsc::SyncSender<CameraState>,
) -> retrocam::Result<CameraController> {
    let renderer = InstantPrintRenderer::new(
        Arc::new(HttpFilmFetcher::default()),
        config.export.clone(),
    );
    let saver = DirectorySaver::new(ConfigManager::get_data_dir().join(&config.export.downloads_dir));
    info!("Prints will be saved to {}", saver.dir().display());

    CameraController::new(config, command_rx, state_tx, Arc::new(renderer), Arc::new(saver))
}

fn describe(state: &CameraState) -> String {
    let mut line = format!(
        "[{}] mode={} film={}",
        state.viewfinder, state.active_preset, state.film
    );
    if state.flashing {
        line.push_str(" *FLASH*");
    }
    if let (Some(id), Some(preset)) = (state.job_id, state.print_preset) {
        line.push_str(&format!(
            " print={id} {} ({}, {})",
            state.print_state,
            preset.era_label(),
            preset.caption_date()
        ));
    }
    if state.save_enabled {
        line.push_str(" [save]");
    }
    if state.exporting {
        line.push_str(" saving...");
    }
    if let Some(path) = &state.last_saved {
        line.push_str(&format!(" saved={}", path.display()));
    }
    if let Some(notice) = &state.last_notice {
        line.push_str(&format!("\n! {notice}"));
    }
    line
}

fn print_help() {
    println!("Commands: preset <noir|koda|retro|sepia|neon|cyber>, load <file>, reset, shutter, save, status, help, quit");
}
