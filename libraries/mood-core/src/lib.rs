//! MoodTune Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every MoodTune crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `Mood`, `MoodAnalysis`
//! - **Collaborator Traits**: `TrackSearchProvider`, `MoodClassifier`, `PreferenceStore`
//! - **Error Handling**: Unified `MoodError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mood_core::{Mood, Track};
//!
//! let track = Track::new("dQw4w9WgXcQ", "Never Gonna Give You Up", "Rick Astley");
//! assert_eq!(track.id.as_str(), "dQw4w9WgXcQ");
//!
//! let mood: Mood = "chill".parse().unwrap();
//! assert_eq!(mood.title(), "Chill");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{MoodError, Result};
pub use traits::{MemoryPreferenceStore, MoodClassifier, PreferenceStore, TrackSearchProvider};
pub use types::{format_time, Mood, MoodAnalysis, Track, TrackId, FALLBACK_QUERY};
