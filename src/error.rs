//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for probing operations.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// A caller-supplied argument failed validation. Raised before any network action.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// Connect, write or read failed. Never surfaced by the engines; collapsed into result data.
    #[error("connection failed: {0}")]
    ConnectionFailed(#[from] std::io::Error),

    #[error("connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    #[error("no async runtime available: {0}")]
    Runtime(String),
}

impl ProbeError {
    pub(crate) fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, ProbeError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
