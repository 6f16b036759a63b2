#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for `RetroCam` unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::config::manager::HOME_ENV_VAR;
use std::ffi::OsString;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `RETROCAM_HOME` environment variable.
static HOME_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `RETROCAM_HOME` at a temp directory for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because other
/// threads may read the environment concurrently. The `HOME_LOCK` mutex is held
/// for the guard's whole lifetime, so only one test touches the variable at a
/// time, and each test gets its own `TempDir`.
pub struct HomeGuard {
    original: Option<OsString>,
    // Held for the lifetime of the guard to serialize environment changes
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under HOME_LOCK"
)]
impl HomeGuard {
    /// Create a new guard that sets `RETROCAM_HOME` to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        // A panicking test poisons the lock; the data is `()` so continuing is fine
        let lock = HOME_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var_os(HOME_ENV_VAR);
        // SAFETY: HOME_LOCK serializes every writer of this variable and is held
        // until the guard is dropped.
        unsafe {
            std::env::set_var(HOME_ENV_VAR, temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under HOME_LOCK"
)]
impl Drop for HomeGuard {
    fn drop(&mut self) {
        // SAFETY: still holding HOME_LOCK; see `HomeGuard::new`.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var(HOME_ENV_VAR, original);
            }
        } else {
            unsafe {
                std::env::remove_var(HOME_ENV_VAR);
            }
        }
    }
}

/// Encode a solid-colour RGB image as PNG bytes, for tests that need a film.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
