//! Scratch data directory for the test server.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A data directory for the test server.
///
/// A directory this guard created is removed, recursively and best-effort,
/// on drop. A directory that already existed is reused and left in place.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    created: bool,
}

impl ScratchDir {
    /// Create `path` (and parents), or reuse it if it already exists.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let created = !path.exists();
        fs::create_dir_all(&path)?;
        tracing::debug!(
            "Scratch directory ready at {} (created: {})",
            path.display(),
            created
        );
        Ok(Self { path, created })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this run created the directory, and so will remove it.
    pub fn created(&self) -> bool {
        self.created
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.created {
            tracing::debug!("Leaving pre-existing directory {}", self.path.display());
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("Removed scratch directory {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!(
                "Could not remove scratch directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
