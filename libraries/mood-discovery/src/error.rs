//! Error types for the discovery clients.

use thiserror::Error;

/// Errors that can occur when talking to a discovery service.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No API key configured
    #[error("API key is missing")]
    MissingApiKey,

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse service response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<url::ParseError> for DiscoveryError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<DiscoveryError> for mood_core::MoodError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::Parse(msg) => Self::Classification(msg),
            other => Self::Network(other.to_string()),
        }
    }
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
