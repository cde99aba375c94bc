//! MoodTune - Playback Session
//!
//! Platform-agnostic playback state for MoodTune.
//!
//! This crate provides:
//! - Current track, FIFO queue, and bounded history (most recent first)
//! - Shuffle (uniform pick from the queue) and repeat (replay current)
//! - Volume control (0-100, persisted through a [`PreferenceStore`])
//! - Edge-triggered auto-advance when position reaches duration
//!
//! # Architecture
//!
//! `mood-playback` knows nothing about the embedded player widget:
//! - Commands mutate [`PlayerSession`] synchronously
//! - Effects are queued as [`PlayerIntent`]s for an adapter to drain
//! - The adapter reports back with [`PlaybackFact`]s
//!
//! [`PreferenceStore`]: mood_core::PreferenceStore
//!
//! # Example
//!
//! ```rust
//! use mood_core::Track;
//! use mood_playback::{PlayerIntent, PlayerSession};
//!
//! let mut session = PlayerSession::default();
//! session.play_all(vec![
//!     Track::new("dQw4w9WgXcQ", "Song A", "Channel A"),
//!     Track::new("9bZkp7q19f0", "Song B", "Channel B"),
//! ]);
//!
//! assert!(session.is_playing());
//! assert_eq!(session.queue_len(), 1);
//!
//! for intent in session.drain_intents() {
//!     if let PlayerIntent::TrackChanged { track, .. } = intent {
//!         println!("load {}", track.id);
//!     }
//! }
//! ```

mod error;
pub mod events;
mod history;
pub mod preferences;
mod queue;
mod session;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{PlaybackFact, PlayerIntent};
pub use preferences::{JsonFilePreferenceStore, VOLUME_KEY};
pub use session::PlayerSession;
pub use types::{PlaybackConfig, PlayerSnapshot};
pub use volume::Volume;
