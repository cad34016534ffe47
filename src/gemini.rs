//! Upstream generative-text model client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_UPSTREAM_TIMEOUT};
use crate::error::CaptionError;

/// A model that answers a prompt with JSON text.
#[async_trait]
pub trait TextModel: std::fmt::Debug + Send + Sync {
    /// Sends `prompt` and returns the raw text the model produced.
    async fn generate_json(&self, prompt: &str) -> Result<String, CaptionError>;
}

/// Connection settings for [`GeminiClient`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key, kept out of logs
    pub api_key: String,
    /// Model name, eg `gemini-2.5-flash-preview-09-2025`
    pub model: String,
    /// API base, without a trailing path
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

// -----------------------------
// generateContent wire format
// -----------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Talks to the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Builds the HTTP client with the configured timeout.
    pub fn new(config: GeminiConfig) -> Result<Self, CaptionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| CaptionError::Configuration(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String, CaptionError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        debug!(model = %self.config.model, "Calling generateContent");
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(CaptionError::Upstream(format!(
                "generateContent returned {status}: {}",
                String::from_utf8_lossy(&bytes)
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|err| {
            CaptionError::MalformedPayload(format!("generateContent body: {err}"))
        })?;
        if let Some(err) = parsed.error {
            return Err(CaptionError::Upstream(format!(
                "generateContent returned error: {err}"
            )));
        }

        parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| {
                CaptionError::MalformedPayload("generateContent returned no text".to_string())
            })
    }
}
