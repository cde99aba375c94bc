//! MoodTune Discovery
//!
//! HTTP clients for finding music and reading moods:
//!
//! - [`YouTubeClient`]: search, related videos, trending music, mood-based
//!   search and video details on the video platform's Data API
//! - [`GeminiMoodClassifier`]: maps free text onto the mood catalog using a
//!   generative language model
//!
//! Both implement the collaborator traits from `mood-core`
//! ([`TrackSearchProvider`](mood_core::TrackSearchProvider),
//! [`MoodClassifier`](mood_core::MoodClassifier)) and are bounded by the
//! timeout in their [`ProviderConfig`].

mod classifier;
mod config;
mod error;
mod types;
mod youtube;

pub use classifier::GeminiMoodClassifier;
pub use config::{ProviderConfig, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, YOUTUBE_BASE_URL};
pub use error::{DiscoveryError, Result};
pub use types::{ContentDetails, Snippet, Statistics, Thumbnail, Thumbnails, VideoDetails};
pub use youtube::YouTubeClient;
