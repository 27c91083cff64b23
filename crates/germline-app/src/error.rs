//! # Design
//!
//! - Centralize job-level errors for the pipeline.
//! - Keep error messages constant while carrying context fields for debugging.
//! - `detail()` renders the context once, for the CLI's final error line.

use std::fmt::Write as _;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The job configuration was rejected.
    #[error("invalid job configuration")]
    Config {
        /// Source configuration error.
        source: germline_config::ConfigError,
    },
    /// An object storage transfer failed.
    #[error("object storage transfer failed")]
    Storage {
        /// Operation identifier.
        operation: &'static str,
        /// Source storage error.
        source: germline_storage::StorageError,
    },
    /// The germline tool failed.
    #[error("germline tool failed")]
    Tool {
        /// Source tool error.
        source: germline_pbrun::PbrunError,
    },
    /// Local filesystem bookkeeping failed.
    #[error("filesystem operation failed")]
    FsOps {
        /// Operation identifier.
        operation: &'static str,
        /// Source fsops error.
        source: germline_fsops::FsOpsError,
    },
}

impl AppError {
    pub(crate) const fn storage(
        operation: &'static str,
        source: germline_storage::StorageError,
    ) -> Self {
        Self::Storage { operation, source }
    }

    /// Exit code reported by the CLI: `2` for rejected configuration, `1` otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Storage { .. } | Self::Tool { .. } | Self::FsOps { .. } => 1,
        }
    }

    /// Message with the failing operation, command and captured output.
    #[must_use]
    pub fn detail(&self) -> String {
        use germline_pbrun::PbrunError;
        use germline_storage::StorageError;

        let mut message = self.to_string();
        match self {
            Self::Config { source } => {
                let _ = write!(message, ": {}", source.detail());
            }
            Self::Storage { operation, source } => match source {
                StorageError::CommandFailed {
                    command,
                    code,
                    output,
                    ..
                } => append_command(&mut message, operation, command, *code, output),
                StorageError::InvalidUri { value, reason } => {
                    let _ = write!(message, " ({operation}): {reason} (got '{value}')");
                }
                StorageError::Spawn { program, source, .. } => {
                    let _ = write!(
                        message,
                        " ({operation}): cannot start {}: {source}",
                        program.display()
                    );
                }
                StorageError::Io { path, source, .. } => {
                    let _ = write!(message, " ({operation}): {}: {source}", path.display());
                }
            },
            Self::Tool { source } => match source {
                PbrunError::NonZeroExit {
                    command,
                    code,
                    output,
                } => append_command(&mut message, "run_germline", command, *code, output),
                PbrunError::Spawn { program, source } => {
                    let _ = write!(message, ": cannot start {}: {source}", program.display());
                }
            },
            Self::FsOps { operation, source } => {
                let germline_fsops::FsOpsError::Walkdir { path, source, .. } = source;
                let _ = write!(message, " ({operation}): {}: {source}", path.display());
            }
        }
        message
    }
}

fn append_command(
    message: &mut String,
    operation: &str,
    command: &str,
    code: Option<i32>,
    output: &str,
) {
    let status = code.map_or_else(|| "terminated by signal".to_string(), |code| {
        format!("exit code {code}")
    });
    let _ = write!(message, " ({operation}, {status}): {command}");
    if !output.is_empty() {
        let _ = write!(message, "\n{output}");
    }
}
