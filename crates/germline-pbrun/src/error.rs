//! Errors raised while running the germline tool.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for tool execution.
pub type PbrunResult<T> = Result<T, PbrunError>;

/// Failures of the external germline tool.
#[derive(Debug, Error)]
pub enum PbrunError {
    /// The launcher could not be started.
    #[error("failed to start germline tool")]
    Spawn {
        /// Launcher path.
        program: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The tool ran and exited unsuccessfully.
    #[error("germline tool exited unsuccessfully")]
    NonZeroExit {
        /// Rendered command line.
        command: String,
        /// Exit code when the process was not killed by a signal.
        code: Option<i32>,
        /// Captured stdout followed by stderr.
        output: String,
    },
}
