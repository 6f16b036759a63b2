//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `$RETROCAM_HOME/retrocam.log`
//! and rotation on every startup, keeping the previous nine sessions.

use crate::config::ConfigManager;
use crate::error::{RetroCamError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Base name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "retrocam.log";

/// Number of historical log files kept (retrocam.log.1 through retrocam.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Initialize the logging system
///
/// Log level defaults to INFO and can be overridden with `RUST_LOG`.
pub fn init_logging() -> Result<()> {
    let log_dir = ConfigManager::get_data_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_logs_on_startup(&log_path)?;

    // Rotation is handled above, per session, so the appender never rolls
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("retrocam")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| RetroCamError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| RetroCamError::ConfigError(Box::new(e)))?;

    tracing::info!("RetroCam v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Shift `name.log.N` to `name.log.N+1`, dropping the oldest, then move the
/// current log to `name.log.1`
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| RetroCamError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| RetroCamError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;

    fn session(dir: &Path, suffix: Option<u8>, content: &str) {
        let name = suffix.map_or_else(|| LOG_FILE_NAME.to_string(), |n| format!("{LOG_FILE_NAME}.{n}"));
        fs::write(dir.join(name), content).unwrap();
    }

    fn read(dir: &Path, n: u8) -> String {
        fs::read_to_string(dir.join(format!("{LOG_FILE_NAME}.{n}"))).unwrap()
    }

    #[test]
    fn test_rotation_moves_current_log() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);
        session(temp_dir.path(), None, "session 1");

        rotate_logs_on_startup(&log_path).unwrap();

        assert!(!log_path.exists());
        assert_eq!(read(temp_dir.path(), 1), "session 1");
    }

    #[test]
    fn test_rotation_without_existing_log() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);

        rotate_logs_on_startup(&log_path).unwrap();

        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rotation_keeps_at_most_nine_sessions() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);

        for i in 1..=12 {
            session(temp_dir.path(), None, &format!("session {i}"));
            rotate_logs_on_startup(&log_path).unwrap();
        }

        assert_eq!(read(temp_dir.path(), 1), "session 12");
        assert_eq!(read(temp_dir.path(), MAX_LOG_FILES), "session 4");
        assert!(!temp_dir.path().join(format!("{LOG_FILE_NAME}.10")).exists());
    }

    #[test]
    fn test_rotation_with_gaps_in_history() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);
        session(temp_dir.path(), None, "current");
        session(temp_dir.path(), Some(1), "previous");
        session(temp_dir.path(), Some(5), "old");

        rotate_logs_on_startup(&log_path).unwrap();

        assert_eq!(read(temp_dir.path(), 1), "current");
        assert_eq!(read(temp_dir.path(), 2), "previous");
        assert_eq!(read(temp_dir.path(), 6), "old");
    }
}
