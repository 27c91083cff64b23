//! # Design
//!
//! - Constant error messages; the failing operation and inputs travel as fields.
//! - Captured command output is kept whole so the caller can log it once.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for object-storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced while addressing or transferring objects.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The supplied value is not a usable `s3://` URI.
    #[error("invalid object storage uri")]
    InvalidUri {
        /// Offending input.
        value: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// The transfer command could not be started.
    #[error("failed to start storage command")]
    Spawn {
        /// Operation that attempted the spawn.
        operation: &'static str,
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The transfer command ran but exited unsuccessfully.
    #[error("storage command exited unsuccessfully")]
    CommandFailed {
        /// Operation that ran the command.
        operation: &'static str,
        /// Rendered command line.
        command: String,
        /// Exit code when the process was not killed by a signal.
        code: Option<i32>,
        /// Captured stdout followed by stderr.
        output: String,
    },
    /// Local filesystem failures around a transfer.
    #[error("storage io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn invalid_uri(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidUri {
            value: value.into(),
            reason,
        }
    }

    /// Build an IO error tagged with the operation and path involved.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn storage_error_messages_stay_constant() {
        let invalid = StorageError::invalid_uri("http://bucket/key", "missing s3:// scheme");
        assert_eq!(invalid.to_string(), "invalid object storage uri");
        assert!(invalid.source().is_none());

        let failed = StorageError::CommandFailed {
            operation: "download_file",
            command: "aws s3 cp s3://b/k /tmp/k".to_string(),
            code: Some(1),
            output: "fatal error".to_string(),
        };
        assert_eq!(failed.to_string(), "storage command exited unsuccessfully");
    }

    #[test]
    fn io_helper_preserves_source() {
        let err = StorageError::io("copy", "/tmp/x", io::Error::other("boom"));
        assert!(matches!(err, StorageError::Io { operation: "copy", .. }));
        assert!(err.source().is_some());
    }
}
