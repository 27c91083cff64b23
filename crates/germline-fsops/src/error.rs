//! # Design
//!
//! - Constant messages; the operation and path travel as fields.
//! - Directory creation and removal never surface here: those failures
//!   degrade to log lines in `workdir.rs`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced by scratch directory helpers.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// Directory traversal failures.
    #[error("fsops walkdir failure")]
    Walkdir {
        /// Operation that triggered the traversal failure.
        operation: &'static str,
        /// Root of the traversal.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}

impl FsOpsError {
    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }
}
