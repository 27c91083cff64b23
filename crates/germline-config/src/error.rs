//! Error types for configuration operations.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// An object storage location could not be parsed.
    #[error("invalid object storage location")]
    InvalidLocation {
        /// Field holding the location.
        field: &'static str,
        /// Underlying storage error.
        source: germline_storage::StorageError,
    },
}

impl ConfigError {
    /// Human-readable detail for CLI output.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidField {
                field,
                value: Some(value),
                reason,
            } => format!("{field}: {reason} (got '{value}')"),
            Self::InvalidField {
                field,
                value: None,
                reason,
            } => format!("{field}: {reason}"),
            Self::InvalidLocation {
                field,
                source: germline_storage::StorageError::InvalidUri { value, reason },
            } => format!("{field}: {reason} (got '{value}')"),
            Self::InvalidLocation { field, source } => format!("{field}: {source}"),
        }
    }
}
