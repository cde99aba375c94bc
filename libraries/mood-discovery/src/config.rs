//! Connection settings shared by the discovery clients.

use crate::error::{DiscoveryError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Video platform Data API root.
pub const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Generative language API root.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for mood classification.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Where and how to reach one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Service root, without trailing slash
    pub base_url: String,

    /// Whole-request timeout (default: 10 s), written as whole seconds
    #[serde(rename = "timeout_secs", with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

// Durations as whole seconds, the shape config files use
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl ProviderConfig {
    /// Settings for an arbitrary service root.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: default_timeout(),
        }
    }

    /// Settings for the public video platform API.
    pub fn youtube(api_key: impl Into<String>) -> Self {
        Self::new(api_key, YOUTUBE_BASE_URL)
    }

    /// Settings for the public generative language API.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new(api_key, GEMINI_BASE_URL)
    }

    /// Point at a different root (used for tests and proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings and return the root URL without trailing slash.
    pub(crate) fn validate(&self) -> Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(DiscoveryError::MissingApiKey);
        }

        let trimmed = self.base_url.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(DiscoveryError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        Url::parse(trimmed)?;
        Ok(trimmed.to_string())
    }

    /// HTTP client with this config's timeout.
    pub(crate) fn http_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout.min(Duration::from_secs(5)))
            .user_agent(format!("MoodTune/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
