//! Settings configuration types

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rarity classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Use the semantic fallback for names with no keyword hit.
    /// When false (or no API key is set), misses default to Common.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the generative-AI API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Upper bound on a fallback request, connect and read included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra keywords per tier label ("Common" .. "Legendary"),
    /// appended to the built-in tables
    #[serde(default)]
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database path (default: ~/.car-collector/collection.db)
    #[serde(default)]
    pub database: Option<PathBuf>,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            extra_keywords: BTreeMap::new(),
        }
    }
}
