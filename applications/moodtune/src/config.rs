/// Application configuration
use crate::error::{AppError, Result};
use mood_bridge::AdapterConfig;
use mood_discovery::{ProviderConfig, GEMINI_BASE_URL, YOUTUBE_BASE_URL};
use mood_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "moodtune.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_provider")]
    pub youtube: ProviderSettings,

    #[serde(default = "default_provider")]
    pub gemini: ProviderSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,

    #[serde(default = "default_preferences")]
    pub preferences: PreferenceSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: String,

    /// Service root; the public endpoint when unset
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_seek_tolerance_secs")]
    pub seek_tolerance_secs: f64,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Give up on the player API after this long
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    #[serde(default = "default_container_id")]
    pub container_id: String,

    /// Length of each simulated preview in the `play` command
    #[serde(default = "default_preview_secs")]
    pub preview_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreferenceSettings {
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `moodtune.toml` in the working directory is
    /// used when present. `MOODTUNE_` variables override file values, with
    /// `__` separating sections (`MOODTUNE_YOUTUBE__API_KEY`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MOODTUNE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, provider) in [("youtube", &self.youtube), ("gemini", &self.gemini)] {
            if provider.timeout_secs == 0 {
                return Err(AppError::Config(format!(
                    "{}.timeout_secs must be greater than zero",
                    name
                )));
            }
        }

        if self.playback.history_size == 0 {
            return Err(AppError::Config(
                "playback.history_size must be greater than zero".to_string(),
            ));
        }

        if self.player.sample_interval_ms == 0 {
            return Err(AppError::Config(
                "player.sample_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.player.load_timeout_secs == 0 {
            return Err(AppError::Config(
                "player.load_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let tolerance = self.player.seek_tolerance_secs;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(AppError::Config(
                "player.seek_tolerance_secs must not be negative".to_string(),
            ));
        }

        let preview = self.player.preview_secs;
        if !preview.is_finite() || preview <= 0.0 {
            return Err(AppError::Config(
                "player.preview_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Video platform settings; the API key is required
    pub fn youtube_provider(&self) -> Result<ProviderConfig> {
        self.youtube.to_provider_config(
            YOUTUBE_BASE_URL,
            "YouTube API key is required (set MOODTUNE_YOUTUBE__API_KEY)",
        )
    }

    /// Classifier settings; the API key is required
    pub fn gemini_provider(&self) -> Result<ProviderConfig> {
        self.gemini.to_provider_config(
            GEMINI_BASE_URL,
            "Gemini API key is required (set MOODTUNE_GEMINI__API_KEY)",
        )
    }
}

impl ProviderSettings {
    fn to_provider_config(&self, default_url: &str, missing_key: &str) -> Result<ProviderConfig> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(missing_key.to_string()));
        }

        let base_url = self.base_url.as_deref().unwrap_or(default_url);
        Ok(ProviderConfig::new(self.api_key.clone(), base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

impl PlayerSettings {
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            seek_tolerance: self.seek_tolerance_secs,
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            load_timeout: Duration::from_secs(self.load_timeout_secs),
            container_id: self.container_id.clone(),
        }
    }
}

// Default values
fn default_provider() -> ProviderSettings {
    ProviderSettings {
        api_key: String::new(),
        base_url: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        seek_tolerance_secs: default_seek_tolerance_secs(),
        sample_interval_ms: default_sample_interval_ms(),
        settle_delay_ms: default_settle_delay_ms(),
        load_timeout_secs: default_load_timeout_secs(),
        container_id: default_container_id(),
        preview_secs: default_preview_secs(),
    }
}

fn default_seek_tolerance_secs() -> f64 {
    2.0
}

fn default_sample_interval_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    250
}

fn default_load_timeout_secs() -> u64 {
    15
}

fn default_container_id() -> String {
    "youtube-player".to_string()
}

fn default_preview_secs() -> f64 {
    30.0
}

fn default_preferences() -> PreferenceSettings {
    PreferenceSettings {
        path: default_preferences_path(),
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("./data/preferences.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            youtube: default_provider(),
            gemini: default_provider(),
            playback: PlaybackConfig::default(),
            player: default_player(),
            preferences: default_preferences(),
        }
    }
}
