/// Core error types for MoodTune
use thiserror::Error;

/// Result type alias using `MoodError`
pub type Result<T> = std::result::Result<T, MoodError>;

/// Core error type for MoodTune
#[derive(Error, Debug)]
pub enum MoodError {
    /// Preference store errors
    #[error("Preference store error: {0}")]
    Preferences(String),

    /// Mood classification failed
    #[error("Classification error: {0}")]
    Classification(String),

    /// Unknown mood name
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl MoodError {
    /// Create a preference store error
    pub fn preferences(msg: impl Into<String>) -> Self {
        Self::Preferences(msg.into())
    }

    /// Create a classification error
    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
