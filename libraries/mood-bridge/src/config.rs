//! Adapter configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and placement settings for the widget adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Seek only when the widget drifts further than this many seconds
    /// from the requested position (default: 2.0)
    pub seek_tolerance: f64,

    /// Position sampling period while playing (default: 1 s)
    pub sample_interval: Duration,

    /// Delay between cueing a track and starting it (default: 250 ms)
    pub settle_delay: Duration,

    /// Give up on the widget API after this long and report the track as
    /// failed (default: 15 s)
    pub load_timeout: Duration,

    /// Host element the widget is mounted into
    pub container_id: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            seek_tolerance: 2.0,
            sample_interval: Duration::from_secs(1),
            settle_delay: Duration::from_millis(250),
            load_timeout: Duration::from_secs(15),
            container_id: "youtube-player".to_string(),
        }
    }
}
