/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to one playable video on the external platform
///
/// Immutable once constructed; shared freely between the player, the adapter
/// and the views. Thumbnail and publish time may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Platform identifier
    pub id: TrackId,

    /// Video title
    pub title: String,

    /// Channel or artist name
    pub author_name: String,

    /// Best available thumbnail
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// When the video was published
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a track with minimal metadata
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        author_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author_name: author_name.into(),
            thumbnail_url: None,
            published_at: None,
        }
    }

    /// Attach a thumbnail URL
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Attach a publish time
    #[must_use]
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}
