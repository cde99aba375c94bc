/// Application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Discovery error: {0}")]
    Discovery(#[from] mood_discovery::DiscoveryError),

    #[error("Playback error: {0}")]
    Playback(#[from] mood_playback::PlaybackError),

    #[error("Player error: {0}")]
    Player(#[from] mood_bridge::BridgeError),

    #[error(transparent)]
    Core(#[from] mood_core::MoodError),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
