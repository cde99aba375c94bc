//! Video platform search client.

use crate::config::ProviderConfig;
use crate::error::{DiscoveryError, Result};
use crate::types::{
    track_from_snippet, ApiErrorResponse, SearchListResponse, VideoDetails, VideoListResponse,
};
use async_trait::async_trait;
use mood_core::{Mood, Track, TrackId, TrackSearchProvider, FALLBACK_QUERY};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Category id of "Music" on the platform.
const MUSIC_CATEGORY: &str = "10";

/// Appended to free-text queries to favour audio uploads over music videos.
const QUERY_SUFFIX: &str = " official audio";

/// Client for the video platform's Data API.
///
/// The [`TrackSearchProvider`] implementation never fails: errors are logged
/// and an empty list is returned.
///
/// # Example
///
/// ```ignore
/// use mood_discovery::{ProviderConfig, YouTubeClient};
/// use mood_core::TrackSearchProvider;
///
/// let client = YouTubeClient::new(ProviderConfig::youtube("api-key"))?;
/// for track in client.by_mood("chill", 10).await {
///     println!("{} - {}", track.author_name, track.title);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let http = config.http_client()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Search music videos, failing loudly.
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let q = format!("{}{}", query, QUERY_SUFFIX);
        let max_results = limit.to_string();

        let response: SearchListResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("maxResults", max_results.as_str()),
                    ("q", q.as_str()),
                    ("type", "video"),
                    ("videoCategoryId", MUSIC_CATEGORY),
                ],
            )
            .await?;

        Ok(search_items_to_tracks(response))
    }

    /// Videos related to `video_id`, failing loudly.
    pub async fn try_related(&self, video_id: &TrackId, limit: usize) -> Result<Vec<Track>> {
        let max_results = limit.to_string();

        let response: SearchListResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("maxResults", max_results.as_str()),
                    ("relatedToVideoId", video_id.as_str()),
                    ("type", "video"),
                ],
            )
            .await?;

        Ok(search_items_to_tracks(response))
    }

    /// Most popular music videos, failing loudly.
    pub async fn try_trending(&self, limit: usize) -> Result<Vec<Track>> {
        let max_results = limit.to_string();

        let response: VideoListResponse = self
            .get(
                "videos",
                &[
                    ("part", "snippet"),
                    ("chart", "mostPopular"),
                    ("videoCategoryId", MUSIC_CATEGORY),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        Ok(response
            .items
            .iter()
            .filter_map(VideoDetails::to_track)
            .collect())
    }

    /// Full details for one video, failing loudly.
    pub async fn try_video_details(&self, video_id: &TrackId) -> Result<Option<VideoDetails>> {
        let response: VideoListResponse = self
            .get(
                "videos",
                &[
                    ("part", "snippet,contentDetails,statistics"),
                    ("id", video_id.as_str()),
                ],
            )
            .await?;

        Ok(response.items.into_iter().next())
    }

    /// Full details for one video; `None` if unknown or on error.
    pub async fn video_details(&self, video_id: &TrackId) -> Option<VideoDetails> {
        match self.try_video_details(video_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Video details lookup failed");
                None
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Requesting video platform API");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(DiscoveryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(e.to_string()))
    }
}

fn search_items_to_tracks(response: SearchListResponse) -> Vec<Track> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            let snippet = item.snippet?;
            Some(track_from_snippet(&id, &snippet))
        })
        .collect()
}

fn soft<T: Default>(operation: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Video platform request failed");
        T::default()
    })
}

#[async_trait]
impl TrackSearchProvider for YouTubeClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<Track> {
        soft("search", self.try_search(query, limit).await)
    }

    async fn related_to(&self, track_id: &TrackId, limit: usize) -> Vec<Track> {
        soft("related", self.try_related(track_id, limit).await)
    }

    async fn trending(&self, limit: usize) -> Vec<Track> {
        soft("trending", self.try_trending(limit).await)
    }

    async fn by_mood(&self, mood: &str, limit: usize) -> Vec<Track> {
        let query = mood
            .parse::<Mood>()
            .map_or(FALLBACK_QUERY, Mood::random_query);
        debug!(mood, query, "Searching by mood");
        self.search(query, limit).await
    }
}
