/// Mood catalog
use crate::error::MoodError;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search query used when a mood has no catalog entry
pub const FALLBACK_QUERY: &str = "popular music";

/// A listening mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Chill,
    Romantic,
    Focus,
}

impl Mood {
    /// Every mood in catalog order
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Chill,
        Mood::Romantic,
        Mood::Focus,
    ];

    /// Lowercase identifier used in routes and provider queries
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Chill => "chill",
            Mood::Romantic => "romantic",
            Mood::Focus => "focus",
        }
    }

    /// Display title
    pub fn title(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Energetic => "Energetic",
            Mood::Chill => "Chill",
            Mood::Romantic => "Romantic",
            Mood::Focus => "Focus",
        }
    }

    /// One-line description shown on the mood page
    pub fn description(self) -> &'static str {
        match self {
            Mood::Happy => "Upbeat tunes to brighten your day and keep the good vibes flowing.",
            Mood::Sad => {
                "Emotional tracks that understand how you feel and help process those feelings."
            }
            Mood::Energetic => {
                "High-energy songs to power your workout or get your day started right."
            }
            Mood::Chill => "Relaxed beats to help you unwind and take it easy.",
            Mood::Romantic => "Love songs and soulful melodies for those special moments.",
            Mood::Focus => "Concentration-enhancing tracks to help you stay in the zone.",
        }
    }

    /// Search queries that represent this mood on the video platform
    pub fn search_queries(self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["happy music", "upbeat songs", "feel good music"],
            Mood::Sad => &["sad songs", "emotional music", "melancholy songs"],
            Mood::Energetic => &["workout music", "pump up songs", "energetic music"],
            Mood::Chill => &["lofi music", "chill beats", "relaxing songs"],
            Mood::Romantic => &["love songs", "romantic music", "slow dance songs"],
            Mood::Focus => &["focus music", "concentration music", "study beats"],
        }
    }

    /// Pick one of this mood's search queries at random
    pub fn random_query(self) -> &'static str {
        self.search_queries()
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_QUERY)
    }

    /// Pick a mood at random ("surprise me")
    pub fn random() -> Mood {
        Mood::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(Mood::Happy)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| MoodError::UnknownMood(s.to_string()))
    }
}

/// Result of classifying free text into a mood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    /// Mood name as returned by the classifier
    pub mood: String,
}

impl MoodAnalysis {
    /// Wrap a catalog mood
    pub fn new(mood: Mood) -> Self {
        Self {
            mood: mood.as_str().to_string(),
        }
    }

    /// Resolve the classifier answer against the catalog
    pub fn as_mood(&self) -> Option<Mood> {
        self.mood.parse().ok()
    }
}
