//! Error types for gateway ingestion.
//!
//! Two layers of errors exist in this crate:
//!
//! - [`DecodeError`] is raised per message by the decoder. It is always non-fatal: the
//!   pipeline reports it and moves on to the next message.
//! - [`GatewayError`] covers the I/O boundary (serial device, log files, configuration).
//!   Opening failures are fatal at startup, read failures are retried by the driver.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use meterlink::GatewayError;
//!
//! let error = GatewayError::read_failed(std::io::Error::other("device unplugged"));
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Failed to open serial device {path}")]
    Device {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from byte source")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Sink write failed: {context}")]
    Sink {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Read { .. } => true,
            GatewayError::Device { .. } => false,
            GatewayError::File { .. } => false,
            GatewayError::Config { .. } => false,
            GatewayError::Sink { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            GatewayError::Device { .. } => vec![
                "Check the device path (e.g. /dev/ttyUSB0)",
                "Verify the gateway is plugged in",
                "Check permissions on the device node (dialout group)",
            ],
            GatewayError::File { .. } => vec![
                "Check the log directory exists and is writable",
                "Ensure sufficient disk space",
            ],
            GatewayError::Read { .. } => vec![
                "Check the serial cable and gateway power",
                "Verify the line discipline with stty",
            ],
            GatewayError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Pass the device path on the command line",
            ],
            GatewayError::Sink { .. } => vec![
                "Ensure sufficient disk space",
                "Check that stdout is still connected",
            ],
        }
    }

    /// Helper constructor for device open errors.
    pub fn device_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GatewayError::Device { path: path.into(), source }
    }

    /// Helper constructor for log file errors with path context.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GatewayError::File { path: path.into(), source }
    }

    /// Helper constructor for byte source read errors.
    pub fn read_failed(source: std::io::Error) -> Self {
        GatewayError::Read { source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        GatewayError::Config { reason: reason.into() }
    }

    /// Helper constructor for sink write errors.
    pub fn sink_failed(context: impl Into<String>, source: std::io::Error) -> Self {
        GatewayError::Sink { context: context.into(), source }
    }
}

impl From<serde_yaml_ng::Error> for GatewayError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        GatewayError::Config { reason: err.to_string() }
    }
}

/// Per-message decode failure.
///
/// Neither variant aborts ingestion; the message has already been raw-logged when
/// one of these is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("message truncated: expected at least {expected} tokens, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("malformed token {token:?} at position {index}")]
    MalformedToken { index: usize, token: String },
}

impl DecodeError {
    /// Short label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Truncated { .. } => "truncated",
            DecodeError::MalformedToken { .. } => "malformed token",
        }
    }
}
