//! Error types for detox.

use std::io;
use thiserror::Error;

/// Result type alias for detox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in detox operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A session is already open and the policy forbids replacing it.
    #[error("Session already in progress: {0}")]
    SessionAlreadyOpen(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
