//! Wire types for the video platform Data API.

use chrono::{DateTime, Utc};
use mood_core::Track;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Option<Snippet>,
}

/// Search results may be channels or playlists; only videos carry a video id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetails>,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Video metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// Thumbnail variants, by size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest available thumbnail: high, then medium, then default.
    pub fn best(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Encoded media details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    /// ISO 8601 duration, e.g. `PT4M13S`
    pub duration: String,
}

/// Public counters; the API sends them as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
}

/// Full record for a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

impl VideoDetails {
    /// Duration in seconds, if reported and well-formed.
    pub fn duration_secs(&self) -> Option<u64> {
        self.content_details
            .as_ref()
            .and_then(|d| parse_iso8601_duration(&d.duration))
    }

    /// View count, if reported.
    pub fn view_count(&self) -> Option<u64> {
        self.statistics
            .as_ref()?
            .view_count
            .as_deref()?
            .parse()
            .ok()
    }

    /// Convert to a track, if the snippet is present.
    pub fn to_track(&self) -> Option<Track> {
        self.snippet
            .as_ref()
            .map(|snippet| track_from_snippet(&self.id, snippet))
    }
}

pub(crate) fn track_from_snippet(id: &str, snippet: &Snippet) -> Track {
    let mut track = Track::new(id, snippet.title.clone(), snippet.channel_title.clone());
    if let Some(url) = snippet.thumbnails.best() {
        track = track.with_thumbnail(url);
    }
    if let Some(published_at) = snippet.published_at {
        track = track.with_published_at(published_at);
    }
    track
}

/// Parse `PT#H#M#S` style durations (days are accepted, weeks are not).
fn parse_iso8601_duration(value: &str) -> Option<u64> {
    let rest = value.strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut total = 0u64;
    let mut number = String::new();

    for c in date.chars() {
        match c {
            '0'..='9' => number.push(c),
            'D' => {
                total += number.parse::<u64>().ok()? * 86_400;
                number.clear();
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }

    for c in time.chars() {
        let unit = match c {
            '0'..='9' => {
                number.push(c);
                continue;
            }
            'H' => 3_600,
            'M' => 60,
            'S' => 1,
            _ => return None,
        };
        total += number.parse::<u64>().ok()? * unit;
        number.clear();
    }

    number.is_empty().then_some(total)
}
