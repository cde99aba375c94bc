//! Core types for playback management

use mood_core::Track;
use serde::{Deserialize, Serialize};

/// Configuration for the player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Volume used when no preference is stored (0-100, default: 70)
    pub default_volume: u8,

    /// "Previous" restarts the current track instead of going back once
    /// playback is past this many seconds (default: 3.0)
    pub restart_threshold_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            default_volume: 70,
            restart_threshold_secs: 3.0,
        }
    }
}

/// Read-only view of the session for renderers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub current_track: Option<Track>,
    pub queue: Vec<Track>,
    /// Most recent first
    pub history: Vec<Track>,
    pub is_playing: bool,
    pub volume: u8,
    pub position: f64,
    pub duration: f64,
    pub shuffle_enabled: bool,
    pub repeat_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 50);
        assert_eq!(config.default_volume, 70);
        assert_eq!(config.restart_threshold_secs, 3.0);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"history_size": 10}"#).unwrap();
        assert_eq!(config.history_size, 10);
        assert_eq!(config.default_volume, 70);
    }
}
