/// Adapter error types
use thiserror::Error;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Adapter errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Player API script could not be loaded
    #[error("Player API failed to load: {0}")]
    ScriptLoad(String),

    /// Widget factory refused to build a widget
    #[error("Widget construction failed: {0}")]
    WidgetConstruction(String),

    /// Runtime is gone (all receivers dropped)
    #[error("Player runtime is not running")]
    RuntimeClosed,

    /// Core error
    #[error(transparent)]
    Core(#[from] mood_core::MoodError),
}
