//! Error types for the Harmony session engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::GenerationError;

/// A shared error type for the entire Harmony workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum HarmonyError {
    /// The session cannot start without a name.
    #[error("Please enter your name to begin.")]
    MissingIdentity,

    /// An operation was requested in a scene that does not support it.
    #[error("Invalid transition: cannot {action} while in {scene}")]
    InvalidTransition { action: String, scene: String },

    /// Another request on the same channel has not finished yet.
    #[error("A {channel} request is already in flight")]
    RequestInFlight { channel: String },

    /// The scene that owned the operation has ended.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Text generation failed.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarmonyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidTransition error
    pub fn invalid_transition(action: impl Into<String>, scene: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            scene: scene.to_string(),
        }
    }

    /// Creates a RequestInFlight error
    pub fn in_flight(channel: impl Into<String>) -> Self {
        Self::RequestInFlight {
            channel: channel.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error must be shown to the user rather than only logged.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity | Self::InvalidTransition { .. } | Self::RequestInFlight { .. }
        )
    }

    /// Check if this is a generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }

    /// Check if resending the same message may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation(err) => err.is_retryable(),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HarmonyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HarmonyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HarmonyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HarmonyError>`.
pub type Result<T> = std::result::Result<T, HarmonyError>;
