//! Domain types for MoodTune

mod ids;
mod mood;
mod time;
mod track;

pub use ids::TrackId;
pub use mood::{Mood, MoodAnalysis, FALLBACK_QUERY};
pub use time::format_time;
pub use track::Track;
