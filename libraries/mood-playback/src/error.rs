//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Preference store rejected a read or write
    #[error("Preference error: {0}")]
    Preferences(#[from] mood_core::MoodError),

    /// Preference file could not be parsed
    #[error("Corrupt preference file: {0}")]
    CorruptPreferences(#[from] serde_json::Error),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
