//! Config file storage.
//!
//! Reads `config.toml` into [`HarmonyConfig`] and layers environment
//! overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use harmony_core::config::HarmonyConfig;
use thiserror::Error;

pub const ENV_FIREBASE_API_KEY: &str = "HARMONY_FIREBASE_API_KEY";
pub const ENV_DATABASE_URL: &str = "HARMONY_DATABASE_URL";
pub const ENV_APP_ID: &str = "HARMONY_APP_ID";
pub const ENV_CUSTOM_TOKEN: &str = "HARMONY_CUSTOM_TOKEN";
pub const ENV_GENERATION_ENDPOINT: &str = "HARMONY_GENERATION_ENDPOINT";
pub const ENV_GENERATION_MODEL: &str = "HARMONY_GENERATION_MODEL";

/// Errors that can occur during config storage operations.
#[derive(Debug, Error)]
pub enum ConfigStorageError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

/// Handle to one `config.toml` file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(&self) -> Result<HarmonyConfig, ConfigStorageError> {
        if !self.path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", self.path.display());
            return Ok(HarmonyConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HarmonyConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Writes the config as pretty TOML, creating the parent directory.
    pub fn save(&self, config: &HarmonyConfig) -> Result<(), ConfigStorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to a sibling temp file, then rename over the target.
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, toml::to_string_pretty(config)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Loads the file and applies overrides from the process environment.
    pub fn load_with_env(&self) -> Result<HarmonyConfig, ConfigStorageError> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Overrides config fields from `lookup` (normally the environment).
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut HarmonyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = get(ENV_FIREBASE_API_KEY) {
        config.persistence.api_key = Some(api_key);
    }
    if let Some(url) = get(ENV_DATABASE_URL) {
        config.persistence.database_url = Some(url);
    }
    if let Some(app_id) = get(ENV_APP_ID) {
        config.persistence.app_id = app_id;
    }
    if let Some(token) = get(ENV_CUSTOM_TOKEN) {
        config.persistence.custom_token = Some(token);
    }
    if let Some(endpoint) = get(ENV_GENERATION_ENDPOINT) {
        config.generation.endpoint = endpoint;
    }
    if let Some(model) = get(ENV_GENERATION_MODEL) {
        config.generation.model = model;
    }
}
