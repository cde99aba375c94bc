/// Collaborator traits for MoodTune
///
/// The playback core only depends on these contracts. Concrete HTTP clients
/// live in `mood-discovery`; the view layer picks the implementation.
use crate::error::{MoodError, Result};
use crate::types::{Mood, MoodAnalysis, Track, TrackId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Source of track lists (search, related, trending, mood)
///
/// Every method fails soft: provider errors are logged by the implementation
/// and surface as an empty list, indistinguishable from "no matches".
#[async_trait]
pub trait TrackSearchProvider: Send + Sync {
    /// Free-text search
    async fn search(&self, query: &str, limit: usize) -> Vec<Track>;

    /// Tracks related to the given one
    async fn related_to(&self, track_id: &TrackId, limit: usize) -> Vec<Track>;

    /// Currently trending music
    async fn trending(&self, limit: usize) -> Vec<Track>;

    /// Tracks matching a mood name
    ///
    /// Unknown moods fall back to a generic popular-music query.
    async fn by_mood(&self, mood: &str, limit: usize) -> Vec<Track>;
}

/// Classifies free text ("how are you feeling?") into a mood
#[async_trait]
pub trait MoodClassifier: Send + Sync {
    /// Classify the text
    ///
    /// # Errors
    /// Returns an error if the classification service is unreachable or its
    /// answer cannot be interpreted.
    async fn classify(&self, text: &str) -> Result<MoodAnalysis>;

    /// Classify and resolve against the mood catalog
    ///
    /// Answers outside the catalog fall back to a random mood.
    async fn classify_mood(&self, text: &str) -> Result<Mood> {
        let analysis = self.classify(text).await?;
        Ok(analysis.as_mood().unwrap_or_else(Mood::random))
    }
}

/// Durable string key-value store for user preferences
pub trait PreferenceStore: Send + Sync {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory preference store
///
/// Used in tests and when no durable location is configured.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.into(), value.into());
        }
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| MoodError::preferences(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
