//! Per-job scratch directory.
//!
//! # Design
//! - Each job gets `<base>/<uuid>` so several jobs can share one host disk.
//! - Creation failures fall back to the base directory instead of aborting.
//! - Only a directory this job created is ever removed; a fallback base is left alone.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Scratch directory owned (or borrowed) by one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDir {
    path: PathBuf,
    owned: bool,
}

/// What [`WorkingDir::remove`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// The directory tree was deleted.
    Removed,
    /// The directory is a fallback base directory and was kept.
    KeptBaseDirectory,
    /// Deletion failed; the failure was logged.
    Failed,
}

impl WorkingDir {
    /// Create a uniquely named directory under `base`.
    ///
    /// The directory is created non-recursively: a missing `base` counts as a
    /// creation failure and the job falls back to `base` itself.
    #[must_use]
    pub fn generate(base: &Path) -> Self {
        Self::generate_with_id(base, Uuid::new_v4())
    }

    /// Same as [`WorkingDir::generate`] with a caller-chosen identifier.
    #[must_use]
    pub fn generate_with_id(base: &Path, id: Uuid) -> Self {
        let path = base.join(id.to_string());
        match fs::create_dir(&path) {
            Ok(()) => {
                info!(working_dir = %path.display(), "created working directory");
                Self { path, owned: true }
            }
            Err(error) => {
                warn!(
                    working_dir = %path.display(),
                    fallback = %base.display(),
                    error = %error,
                    "could not create working directory; using base directory"
                );
                Self {
                    path: base.to_path_buf(),
                    owned: false,
                }
            }
        }
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this job created the directory (and may therefore delete it).
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        self.owned
    }

    /// Create `name` inside the working directory, ignoring any failure.
    ///
    /// Used where the directory usually already exists on a reused base.
    #[must_use]
    pub fn subdir_quiet(&self, name: &str) -> PathBuf {
        let dir = self.path.join(name);
        if let Err(error) = fs::create_dir(&dir) {
            debug!(dir = %dir.display(), error = %error, "subdirectory not created");
        }
        dir
    }

    /// Create `name` inside the working directory, logging any failure.
    #[must_use]
    pub fn subdir_logged(&self, name: &str) -> PathBuf {
        let dir = self.path.join(name);
        if let Err(error) = fs::create_dir(&dir) {
            warn!(dir = %dir.display(), error = %error, "cannot create directory");
        }
        dir
    }

    /// Delete the directory tree if this job created it.
    pub fn remove(&self) -> CleanupOutcome {
        if !self.owned {
            warn!(
                working_dir = %self.path.display(),
                "working directory is the shared base; leaving it in place"
            );
            return CleanupOutcome::KeptBaseDirectory;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!(working_dir = %self.path.display(), "removed working directory");
                CleanupOutcome::Removed
            }
            Err(error) => {
                warn!(
                    working_dir = %self.path.display(),
                    error = %error,
                    "can't delete working directory"
                );
                CleanupOutcome::Failed
            }
        }
    }
}
