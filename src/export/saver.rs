//! Handing rendered prints to the user

use crate::error::{RetroCamError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Capability to deliver an encoded print under a file name
pub trait FileSaver: Send + Sync {
    /// Store `bytes` as `filename`, returning where it ended up
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes prints into a downloads directory
///
/// Writes go to a temporary file in the same directory and are persisted
/// under the final name only once complete, so a failed save never leaves a
/// partial file behind.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    /// Save into `dir`, creating it on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(filename);
        if name.file_name().is_none_or(|f| f != name.as_os_str()) {
            return Err(RetroCamError::SaveFailed(crate::error::StringError::new(
                format!("invalid file name: {filename}"),
            )));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| RetroCamError::SaveFailed(Box::new(e)))?;

        let target = self.dir.join(name);
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| RetroCamError::SaveFailed(Box::new(e)))?;
        temp.write_all(bytes)
            .and_then(|()| temp.flush())
            .map_err(|e| RetroCamError::SaveFailed(Box::new(e)))?;
        temp.persist(&target)
            .map_err(|e| RetroCamError::SaveFailed(Box::new(e.error)))?;

        info!("Saved print to {}", target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_saves_into_directory() {
        let dir = create_test_dir();
        let saver = DirectorySaver::new(dir.path().join("downloads"));

        let path = saver.save("retrocam-koda-1.png", b"png bytes").unwrap();
        assert_eq!(path, dir.path().join("downloads").join("retrocam-koda-1.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");
    }

    #[test]
    fn test_leaves_no_temp_files() {
        let dir = create_test_dir();
        let saver = DirectorySaver::new(dir.path());
        saver.save("a.png", b"1").unwrap();
        saver.save("b.png", b"2").unwrap();

        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = create_test_dir();
        let saver = DirectorySaver::new(dir.path());
        let err = saver.save("../escape.png", b"x").unwrap_err();
        assert!(matches!(err, RetroCamError::SaveFailed(_)));
    }
}
