//! Wire types shared by the generation endpoint and its client.

use serde::{Deserialize, Serialize};

use crate::tone::Tone;

/// Body of `POST /api/generate`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GenerateRequestBody {
    /// The user's idea
    #[serde(default)]
    pub prompt: Option<String>,
    /// Tone name, anything unknown is treated as funny
    #[serde(default)]
    pub mode: Option<String>,
}

/// A validated generation request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationRequest {
    /// Non-empty idea text
    pub idea: String,
    /// Selected tone
    pub tone: Tone,
}

impl GenerationRequest {
    /// Returns `None` when the idea is blank.
    pub fn new(idea: &str, tone: Tone) -> Option<Self> {
        if idea.trim().is_empty() {
            return None;
        }
        Some(Self {
            idea: idea.to_string(),
            tone,
        })
    }

    /// The body sent to the generation endpoint.
    pub fn to_body(&self) -> GenerateRequestBody {
        GenerateRequestBody {
            prompt: Some(self.idea.clone()),
            mode: Some(self.tone.as_str().to_string()),
        }
    }
}

impl TryFrom<GenerateRequestBody> for GenerationRequest {
    type Error = GenerateRequestBody;

    fn try_from(body: GenerateRequestBody) -> Result<Self, Self::Error> {
        let tone = Tone::from_mode(body.mode.as_deref());
        match body.prompt.as_deref().and_then(|idea| Self::new(idea, tone)) {
            Some(request) => Ok(request),
            None => Err(body),
        }
    }
}

/// Caption, image URLs and the prompts they were derived from.
///
/// `images[i]` is always rendered from `image_prompts[i]`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenerationResult {
    /// Post text
    #[serde(default)]
    pub caption: String,
    /// Render URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Prompts behind `images`
    #[serde(default)]
    pub image_prompts: Vec<String>,
}

/// Body of every error response.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Generic message, never carries internals
    pub error: String,
}
