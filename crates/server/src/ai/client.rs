//! OpenRouter client for the OpenAI-compatible chat completions API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Token ceiling for every completion
const MAX_TOKENS: u32 = 2000;

/// Longest provider error body relayed to callers, in characters
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Failure of a single upstream call
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("{status} from provider: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Malformed(String),
}

/// Client for the OpenRouter chat completions endpoint
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    json_mode: bool,
    referer: String,
    title: String,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Response payload, stored in the response cache.
///
/// Fields not modelled here (`usage`, `provider`, ...) are kept in `extra`
/// so the cached value serializes back to the full payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ChatCompletion {
    /// Text of the first choice
    pub fn text(&self) -> Result<&str, UpstreamError> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| UpstreamError::Malformed("No message content in response".to_string()))
    }
}

/// Error detail from the provider
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenRouterClient {
    /// Create a client from server configuration; `None` without an API key
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.openrouter_api_key.clone()?;
        Some(Self::new(
            api_key,
            &config.openrouter_base_url,
            &config.openrouter_model,
            config.upstream_timeout,
        )
        .with_json_mode(config.json_mode)
        .with_app_identity(&config.app_referer, &config.app_title))
    }

    /// Create a new client for `model` at `base_url`
    pub fn new(api_key: String, base_url: &str, model: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            json_mode: false,
            referer: "http://localhost:5000".to_string(),
            title: "Veterinary AI Assistant".to_string(),
        }
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Attribution headers OpenRouter shows on its dashboard
    pub fn with_app_identity(mut self, referer: &str, title: &str) -> Self {
        self.referer = referer.to_string();
        self.title = title.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user prompt, one attempt, no caching
    pub async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<ChatCompletion, UpstreamError> {
        let request = ApiRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
                extra: Map::new(),
            }],
            temperature,
            max_tokens: MAX_TOKENS,
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_err) = serde_json::from_str::<ApiError>(&body) {
                return Err(UpstreamError::Status {
                    status,
                    body: api_err.error.message,
                });
            }
            return Err(UpstreamError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        // Reject payloads without text here so they are retried and never cached
        completion.text()?;
        Ok(completion)
    }
}

/// Cap a provider error body before it is relayed to callers
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
