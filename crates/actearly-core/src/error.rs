//! Core error types for actearly-core.
//!
//! Nothing in this hierarchy is fatal to the break cycle: provider and
//! persistence failures are recovered close to where they happen and only
//! surface here so they can be logged or reported by the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::AppState;

/// Core error type for actearly-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content provider errors
    #[error("Content provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A user action that the current state does not accept.
    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: AppState,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Data directory could not be created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored blob could not be decoded
    #[error("Corrupt value under key '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Failures of the external content provider.
///
/// Every variant is recoverable: callers fall back to the local library or
/// the built-in tip deck.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No backend endpoint is configured
    #[error("content provider is not configured")]
    NotConfigured,

    /// Transport failure (connect, timeout) or a response body that is
    /// not the backend envelope. Non-2xx answers carrying the envelope are
    /// reported through `Rejected`.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with `ok: false`
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Backend reported that generation is temporarily unavailable
    #[error("content generation temporarily unavailable")]
    Unavailable,

    /// Response text was not the structured payload we asked for
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Backend answered with an empty list
    #[error("provider returned no items")]
    Empty,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
