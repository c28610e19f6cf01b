//! Error types for chroma-check operations.
//!
//! This module defines [`CheckError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe failures are NOT errors: each probe turns them into a typed
//!   outcome that the report prints
//! - `CheckError` covers what stops a probe from producing an outcome
//!   (spawn failures, timeouts, transport errors) and configuration problems
//! - Use `anyhow::Error` (via `CheckError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chroma-check operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration file not found at the requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The scratch data directory would contain the working directory.
    #[error("Refusing to use {path} as the scratch data directory: it contains the working directory")]
    UnsafeDataDir { path: PathBuf },

    /// A child process could not be started.
    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A child process did not finish within its timeout and was killed.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    /// HTTP transport failure (connection refused, timeout, ...).
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for chroma-check operations.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = CheckError::ConfigNotFound {
            path: PathBuf::from("/etc/chroma-check.yml"),
        };
        assert!(err.to_string().contains("/etc/chroma-check.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = CheckError::ConfigParseError {
            path: PathBuf::from("chroma-check.yml"),
            message: "invalid type: string, expected u16".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("chroma-check.yml"));
        assert!(msg.contains("expected u16"));
    }

    #[test]
    fn spawn_failed_displays_command_and_cause() {
        let err = CheckError::SpawnFailed {
            command: "chroma run".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("chroma run"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn timeout_displays_seconds() {
        let err = CheckError::Timeout {
            command: "py -3 -c ...".into(),
            timeout_secs: 5,
        };
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn http_displays_url() {
        let err = CheckError::Http {
            url: "http://127.0.0.1:8000/api/v2/heartbeat".into(),
            message: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/api/v2/heartbeat"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CheckError = io_err.into();
        assert!(matches!(err, CheckError::Io(_)));
    }
}
