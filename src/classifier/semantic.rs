//! Fallback semantic classifier backed by a generative-AI endpoint

use std::time::Duration;

use crate::config::ClassifierSettings;

/// Failure of the semantic fallback. Always recovered by defaulting to Common.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("semantic classifier is disabled")]
    Disabled,

    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("unexpected classifier response: {0}")]
    BadResponse(String),

    #[error("classifier answered with unknown tier {0:?}")]
    UnknownTier(String),
}

/// Maps a car name to one of the tier labels as free text
pub trait SemanticClassifier {
    fn classify(&self, car_name: &str) -> Result<String, ClassifierError>;
}

impl<T: SemanticClassifier + ?Sized> SemanticClassifier for Box<T> {
    fn classify(&self, car_name: &str) -> Result<String, ClassifierError> {
        (**self).classify(car_name)
    }
}

impl<T: SemanticClassifier + ?Sized> SemanticClassifier for &T {
    fn classify(&self, car_name: &str) -> Result<String, ClassifierError> {
        (**self).classify(car_name)
    }
}

/// Classifier used when the fallback is disabled or has no credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl SemanticClassifier for Unavailable {
    fn classify(&self, _car_name: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClassifier {
    endpoint: String,
    model: String,
    api_key: String,
    agent: ureq::Agent,
}

impl GeminiClassifier {
    pub fn new(settings: &ClassifierSettings, api_key: impl Into<String>) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout(timeout)
            .build();

        Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.into(),
            agent,
        }
    }

    /// Build from settings, reading the key from the configured env var.
    /// Returns `None` when disabled or the key is missing.
    pub fn from_settings(settings: &ClassifierSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        let key = std::env::var(&settings.api_key_env).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self::new(settings, key.trim()))
    }

    fn prompt(car_name: &str) -> String {
        format!(
            "Classify the rarity of this car as a car spotter would see it on the street: {car_name}\n\
             Answer with exactly one word from this list: Common, Uncommon, Rare, Exotic, Legendary."
        )
    }
}

impl SemanticClassifier for GeminiClassifier {
    fn classify(&self, car_name: &str) -> Result<String, ClassifierError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": Self::prompt(car_name) }] }],
            "generationConfig": { "temperature": 0.0, "maxOutputTokens": 5 }
        });

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(transport_error)?;

        let json: serde_json::Value = response
            .into_json()
            .map_err(|e| ClassifierError::BadResponse(e.to_string()))?;

        extract_text(&json)
    }
}

/// Describe a request failure without echoing the URL, which carries the key
fn transport_error(err: ureq::Error) -> ClassifierError {
    match err {
        ureq::Error::Status(code, _) => ClassifierError::Transport(format!("HTTP {}", code)),
        ureq::Error::Transport(t) => ClassifierError::Transport(t.kind().to_string()),
    }
}

/// Pull the answer text out of a `generateContent` response
fn extract_text(json: &serde_json::Value) -> Result<String, ClassifierError> {
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Err(ClassifierError::BadResponse(message.to_string()));
    }

    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .ok_or_else(|| ClassifierError::BadResponse("missing candidate text".to_string()))
}
