//! Application configuration model.
//!
//! Every field has a default so an empty or missing `config.toml` is valid.

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_INTERVAL_MS;
use crate::chart::DEFAULT_HIT_RADIUS;
use crate::generation::DEFAULT_MAX_TOKENS;

pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://itp-ima-replicate-proxy.web.app/api/create_n_get";
pub const DEFAULT_GENERATION_MODEL: &str = "meta/meta-llama-3-8b-instruct";
pub const DEFAULT_APP_ID: &str = "harmony-self-local";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct HarmonyConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            model: DEFAULT_GENERATION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: 60,
        }
    }
}

/// Hosted database settings. Without an API key and database URL the
/// session runs against the in-memory store.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    pub api_key: Option<String>,
    pub database_url: Option<String>,
    pub app_id: String,
    /// Signs in with this token instead of anonymously.
    pub custom_token: Option<String>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            database_url: None,
            app_id: DEFAULT_APP_ID.to_string(),
            custom_token: None,
        }
    }
}

impl PersistenceConfig {
    pub fn is_configured(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.api_key) && present(&self.database_url)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AmbientConfig {
    pub interval_ms: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub hit_radius: f64,
    pub frame_interval_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            frame_interval_ms: 16,
        }
    }
}

/// Virtual viewport the pointer coordinates refer to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f64,
    pub height: f64,
    pub shape_radius: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            shape_radius: 110.0,
        }
    }
}
