//! Player intents and playback facts
//!
//! The session never talks to the player widget directly. It queues
//! *intents* describing what playback should look like, and accepts *facts*
//! reported back by whoever drives the widget:
//!
//! ```text
//! PlayerSession ──intents──▶ adapter ──▶ widget
//!       ▲                                  │
//!       └──────────── facts ◀──────────────┘
//! ```

use mood_core::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Intents emitted by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerIntent {
    /// A new track became current and should be loaded
    TrackChanged {
        /// Track to load
        track: Track,
        /// Whether playback should start once loaded
        autoplay: bool,
    },

    /// Play/pause flag flipped
    PlaybackChanged {
        /// New value of the playing flag
        playing: bool,
    },

    /// Position was set (user seek, restart, or a reported tick)
    PositionSet {
        /// Position in seconds
        position: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New level (0-100)
        level: u8,
    },

    /// Queue contents changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Current track reached its end and auto-advance fired
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },
}

/// Facts reported by the widget adapter
///
/// Each fact names the track it concerns. Facts about a track that is no
/// longer current are stale and ignored by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackFact {
    /// Periodic position sample
    PositionTick {
        /// Track being sampled
        track_id: TrackId,
        /// Live position in seconds
        position: f64,
    },

    /// Track metadata is known
    DurationKnown {
        /// Track the duration belongs to
        track_id: TrackId,
        /// Duration in seconds
        duration: f64,
    },

    /// Widget reported the end of the track
    Ended {
        /// Finished track
        track_id: TrackId,
    },

    /// Widget could not play the track
    Failed {
        /// Unplayable track
        track_id: TrackId,
        /// Widget error code
        code: i32,
    },
}

impl PlaybackFact {
    /// Track this fact is about
    pub fn track_id(&self) -> &TrackId {
        match self {
            PlaybackFact::PositionTick { track_id, .. }
            | PlaybackFact::DurationKnown { track_id, .. }
            | PlaybackFact::Ended { track_id }
            | PlaybackFact::Failed { track_id, .. } => track_id,
        }
    }
}
