//! Unified path management for harmony files.
//!
//! ```text
//! ~/.config/harmony/           # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── harmony.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use thiserror::Error;

const APP_DIR: &str = "harmony";
const CONFIG_FILE: &str = "config.toml";
const LOGS_DIR: &str = "logs";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Unified path management for harmony.
pub struct HarmonyPaths;

impl HarmonyPaths {
    /// Returns the harmony configuration directory (e.g., `~/.config/harmony/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the directory the rolling log files are written to.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(LOGS_DIR))
    }
}
