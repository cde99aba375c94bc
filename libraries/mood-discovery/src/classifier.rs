//! Free-text mood classification via a generative language model.

use crate::config::{ProviderConfig, GEMINI_DEFAULT_MODEL};
use crate::error::{DiscoveryError, Result};
use async_trait::async_trait;
use mood_core::{Mood, MoodAnalysis, MoodClassifier, MoodError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Classifies how someone feels into one of the catalog moods.
#[derive(Debug, Clone)]
pub struct GeminiMoodClassifier {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiMoodClassifier {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let http = config.http_client()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
            model: GEMINI_DEFAULT_MODEL.to_string(),
        })
    }

    /// Use a different model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask the model and return its raw answer.
    pub async fn try_classify(&self, text: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(text),
                }],
            }],
        };

        debug!(model = %self.model, "Requesting mood classification");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(e.to_string()))?;

        body.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or_else(|| DiscoveryError::Parse("empty model answer".into()))
    }
}

fn build_prompt(text: &str) -> String {
    let moods: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
    format!(
        "Classify the mood of the following text as exactly one of: {}. \
         Answer with the single word only.\n\nText: {}",
        moods.join(", "),
        text.trim()
    )
}

/// Pick the first catalog mood named in the answer, else keep the answer.
fn interpret_answer(answer: &str) -> MoodAnalysis {
    let normalized = answer.trim().to_lowercase();
    let mood = normalized
        .split(|c: char| !c.is_alphabetic())
        .find_map(|word| word.parse::<Mood>().ok());

    match mood {
        Some(mood) => MoodAnalysis::new(mood),
        None => MoodAnalysis {
            mood: normalized,
        },
    }
}

#[async_trait]
impl MoodClassifier for GeminiMoodClassifier {
    async fn classify(&self, text: &str) -> mood_core::Result<MoodAnalysis> {
        if text.trim().is_empty() {
            return Err(MoodError::invalid_input("nothing to classify"));
        }

        let answer = self.try_classify(text).await?;
        let analysis = interpret_answer(&answer);
        info!(mood = %analysis.mood, "Classified mood");
        Ok(analysis)
    }
}
