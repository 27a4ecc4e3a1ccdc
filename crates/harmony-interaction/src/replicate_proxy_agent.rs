//! ReplicateProxyAgent - text generation through the hosted Replicate proxy.
//!
//! One POST per call: `{"model", "input": {system_prompt, prompt, max_tokens}}`
//! in, `{"output": [fragments]}` out. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use harmony_core::config::GenerationConfig;
use harmony_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Generator that talks to the Replicate proxy over HTTP.
#[derive(Clone)]
pub struct ReplicateProxyAgent {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl ReplicateProxyAgent {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.endpoint.clone(), config.model.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &ProxyRequest<'_>) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GenerationError::transport(format!("Replicate proxy request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read proxy error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ProxyResponse = response.json().await.map_err(|err| {
            GenerationError::Other(format!("Failed to parse proxy response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for ReplicateProxyAgent {
    fn name(&self) -> &str {
        "replicate_proxy"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = ProxyRequest {
            model: &self.model,
            input: ProxyInput {
                system_prompt: &request.system_prompt,
                prompt: &request.prompt,
                max_tokens: request.max_tokens,
            },
        };

        tracing::debug!(
            "[Generation] POST {} model={} max_tokens={}",
            self.endpoint,
            self.model,
            request.max_tokens
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
pub(crate) struct ProxyRequest<'a> {
    model: &'a str,
    input: ProxyInput<'a>,
}

#[derive(Serialize)]
struct ProxyInput<'a> {
    system_prompt: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
pub(crate) struct ProxyResponse {
    #[serde(default)]
    output: Option<ProxyOutput>,
}

/// Streamed models return fragments, some proxies a single string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProxyOutput {
    Fragments(Vec<String>),
    Text(String),
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(alias = "detail")]
    error: String,
}

fn extract_text_response(response: ProxyResponse) -> Result<String, GenerationError> {
    let text = match response.output {
        Some(ProxyOutput::Fragments(fragments)) if !fragments.is_empty() => fragments.concat(),
        Some(ProxyOutput::Text(text)) if !text.is_empty() => text,
        _ => return Err(GenerationError::EmptyOutput),
    };
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GenerationError::ProcessError {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
    }
}
