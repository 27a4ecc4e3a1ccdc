//! Text-generation contract shared by the hosted model client and the
//! scripted stand-in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token cap sent with every request unless configured otherwise.
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// One system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Failures of a single generation call. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The endpoint answered with an error status.
    #[error("Process error (status {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
    },

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response carried no output fragments.
    #[error("No output from model")]
    EmptyOutput,

    /// The scene that issued the call ended first.
    #[error("Generation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether sending the same request again may succeed: overload and
    /// gateway statuses, or a lost connection. The session never resends on
    /// its own; the user decides.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProcessError { is_retryable, .. } => *is_retryable,
            Self::Transport(_) => true,
            Self::EmptyOutput | Self::Cancelled | Self::Other(_) => false,
        }
    }
}

/// Anything that turns a prompt pair into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
