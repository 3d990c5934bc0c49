//! Blocking chat-completions client.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use voxspec_callflow::{
    render_generation_prompt, sanitise_call_flow_response, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use voxspec_contracts::{
    error::{VoxspecError, VoxspecResult},
    spec::{CallFlow, CallFlowRequest},
};
use voxspec_core::traits::CallFlowGenerator;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Error bodies longer than this are cut before they land in an error.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Connection settings for [`OpenAiClient`].
///
/// Environment variables read by [`OpenAiConfig::from_env`]:
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_BASE_URL` (optional, e.g. a proxy or compatible server)
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Transport-level timeout for one HTTP request.
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_env() -> VoxspecResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| VoxspecError::Config {
                reason: "OPENAI_API_KEY not set".to_string(),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        Ok(config)
    }

    /// The chat-completions endpoint under `base_url`.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// The key must never reach a log line.
impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Trimmed content of the first choice, or `""` when there is none.
    pub fn first_content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .unwrap_or_default()
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// A `CallFlowGenerator` backed by an OpenAI-compatible chat endpoint.
///
/// One attempt per `generate` call; retrying is the builder's job.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> VoxspecResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VoxspecError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> VoxspecResult<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// The request body sent for `request`.
    pub fn chat_request(&self, request: &CallFlowRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: render_generation_prompt(request),
            }],
        }
    }
}

impl CallFlowGenerator for OpenAiClient {
    fn generate(&self, request: &CallFlowRequest) -> VoxspecResult<CallFlow> {
        let body = self.chat_request(request);
        debug!(model = %body.model, url = %self.config.endpoint(), "requesting call flow");

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| VoxspecError::CallFlowGeneration {
                status: e.status().map(|s| s.as_u16()),
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let text: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            warn!(status = status.as_u16(), "call flow request rejected");
            return Err(VoxspecError::CallFlowGeneration {
                status: Some(status.as_u16()),
                reason: format!("HTTP {status}: {text}"),
            });
        }

        let parsed: ChatResponse = response.json().map_err(|e| VoxspecError::CallFlowParse {
            reason: format!("chat completion envelope is not valid JSON: {e}"),
        })?;

        let sanitised = sanitise_call_flow_response(parsed.first_content())?;
        if !sanitised.notes.is_empty() {
            warn!(
                notes = sanitised.notes.len(),
                "call flow reply needed coercion"
            );
        }
        Ok(sanitised.call_flow)
    }
}
