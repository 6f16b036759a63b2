//! Current film reference

use crate::error::{RetroCamError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where a film's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Remote image fetched over HTTP(S)
    Remote(String),
    /// File chosen by the user
    Local(PathBuf),
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Tracks the default film and the optional user-loaded one
#[derive(Debug, Clone)]
pub struct ImageSource {
    default: Arc<ImageRef>,
    custom: Option<Arc<ImageRef>>,
}

impl ImageSource {
    /// Create a source whose default film is the remote `default_url`
    pub fn new(default_url: impl Into<String>) -> Self {
        Self {
            default: Arc::new(ImageRef::Remote(default_url.into())),
            custom: None,
        }
    }

    /// The film currently in the camera
    pub fn current(&self) -> Arc<ImageRef> {
        Arc::clone(self.custom.as_ref().unwrap_or(&self.default))
    }

    /// Whether a user-loaded film replaces the default
    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Load a local image file as the current film
    ///
    /// The path must be an existing file with an image extension the camera
    /// can decode. On error the current film is unchanged.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<ImageRef>> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(RetroCamError::InvalidFilm {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }
        if image::ImageFormat::from_path(path).is_err() {
            return Err(RetroCamError::InvalidFilm {
                path: path.to_path_buf(),
                reason: "not a supported image type".to_string(),
            });
        }

        let film = Arc::new(ImageRef::Local(path.to_path_buf()));
        self.custom = Some(Arc::clone(&film));
        info!("Loaded film: {}", path.display());
        Ok(film)
    }

    /// Go back to the default film
    pub fn clear_custom(&mut self) {
        if self.custom.take().is_some() {
            info!("Reverted to default film");
        }
    }
}
