//! Reading film bytes for rendering
//!
//! Local films are read from disk, remote films are downloaded with a
//! blocking HTTP client. Both paths enforce a size cap so a huge file cannot
//! stall the export worker.

use crate::error::{RetroCamError, Result, StringError};
use crate::source::ImageRef;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest film the camera will read (32 MiB)
pub const MAX_FILM_BYTES: u64 = 32 * 1024 * 1024;

/// Capability to fetch the raw bytes of a film
pub trait FilmFetcher: Send + Sync {
    /// Return the encoded image bytes behind `image`
    fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>>;
}

/// Default fetcher: filesystem for local films, HTTP(S) for remote ones
#[derive(Debug, Clone)]
pub struct HttpFilmFetcher {
    timeout: Duration,
    max_bytes: u64,
}

impl HttpFilmFetcher {
    /// Create a fetcher with a request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            max_bytes: MAX_FILM_BYTES,
        }
    }

    /// Override the size cap
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn read_local(&self, path: &std::path::Path) -> Result<Vec<u8>> {
        let file = std::fs::File::open(path)
            .map_err(|e| RetroCamError::ImageFetchFailed(Box::new(e)))?;
        let len = file
            .metadata()
            .map_err(|e| RetroCamError::ImageFetchFailed(Box::new(e)))?
            .len();
        if len > self.max_bytes {
            return Err(RetroCamError::ImageFetchFailed(StringError::new(format!(
                "{} is {len} bytes, limit is {}",
                path.display(),
                self.max_bytes
            ))));
        }

        let mut data = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
        file.take(self.max_bytes)
            .read_to_end(&mut data)
            .map_err(|e| RetroCamError::ImageFetchFailed(Box::new(e)))?;
        Ok(data)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading film from: {}", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(format!("RetroCam/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                RetroCamError::ImageFetchFailed(Box::new(e))
            })?;

        let response = client.get(url).send().map_err(|e| {
            warn!("Failed to download film: {}", e);
            RetroCamError::ImageFetchFailed(Box::new(e))
        })?;

        if !response.status().is_success() {
            warn!("Film server returned error status: {}", response.status());
            return Err(RetroCamError::ImageFetchFailed(StringError::new(format!(
                "server returned {}",
                response.status()
            ))));
        }

        let mut data = Vec::new();
        response
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut data)
            .map_err(|e| RetroCamError::ImageFetchFailed(Box::new(e)))?;
        if data.len() as u64 > self.max_bytes {
            return Err(RetroCamError::ImageFetchFailed(StringError::new(format!(
                "remote film exceeds {} bytes",
                self.max_bytes
            ))));
        }

        debug!("Downloaded {} bytes", data.len());
        Ok(data)
    }
}

impl Default for HttpFilmFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl FilmFetcher for HttpFilmFetcher {
    fn fetch(&self, image: &ImageRef) -> Result<Vec<u8>> {
        match image {
            ImageRef::Local(path) => self.read_local(path),
            ImageRef::Remote(url) => self.download(url),
        }
    }
}
