//! Unified error types for the kiwi bind workspace.
//!
//! Higher-level crates define their own domain-specific error enums that
//! wrap these common variants when appropriate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum KiwiError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An external command exited unsuccessfully.
    #[error("command `{command}` failed (exit code {code}): {stderr}")]
    Command {
        /// The command line that was executed, joined by spaces.
        command: String,
        /// Exit code, or -1 if the process was killed by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, KiwiError>;
