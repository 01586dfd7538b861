//! Core error types for mellow-core.
//!
//! Most journal operations degrade gracefully instead of failing (malformed
//! data loads as empty, failed writes are logged). The errors here cover the
//! remaining cases: opening storage, reading configuration and rejecting
//! invalid input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mellow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Backing file for a file-based slot could not be read or written
    #[error("Slot file {path}: {source}")]
    SlotFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration outside the allowed range
    #[error("duration {minutes}m is outside {min}..={max} minutes")]
    DurationOutOfRange { minutes: u32, min: u32, max: u32 },

    /// Required text field is blank
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Unknown name for a closed set (mode, tag, emotion, pattern)
    #[error("unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    /// Operation not allowed in the current phase
    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_read_naturally() {
        let err = ValidationError::DurationOutOfRange { minutes: 90, min: 5, max: 60 };
        assert_eq!(err.to_string(), "duration 90m is outside 5..=60 minutes");
        let err = ValidationError::WrongPhase { action: "save", phase: "in setup" };
        assert_eq!(err.to_string(), "cannot save while in setup");
    }

    #[test]
    fn errors_convert_into_core_error() {
        let core: CoreError = ValidationError::EmptyField("goal").into();
        assert!(matches!(core, CoreError::Validation(_)));

        let core: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(core, CoreError::Storage(StorageError::QueryFailed(_))));

        let parsed: Result<serde_json::Value> = serde_json::from_str("{").map_err(Into::into);
        assert!(matches!(parsed, Err(CoreError::Json(_))));
    }
}
