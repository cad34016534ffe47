//! Client side of the generation endpoint.
//!
//! The [`Orchestrator`] always hands back something displayable: when the
//! service can't produce a result the offline fallback does.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use crate::constants::{
    DEFAULT_CLIENT_TIMEOUT, GENERATE_PATH, IMAGE_PROMPT_COUNT, POINTS_FALLBACK_GENERATION,
    POINTS_NETWORK_GENERATION,
};
use crate::fallback;
use crate::images::ImageEndpoint;
use crate::score::ScoreStore;
use crate::types::{GenerationRequest, GenerationResult};

pub mod host;
pub mod session;
pub mod state;

/// Why the network path didn't produce a result.
#[derive(Debug)]
pub enum ClientError {
    /// Couldn't reach the endpoint, or it timed out
    Transport(String),
    /// The endpoint answered with a non-2xx status
    Status(u16),
    /// The body wasn't a usable result
    Decode(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status(status) => write!(f, "generation endpoint returned {status}"),
            Self::Decode(msg) => write!(f, "unusable response: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Something that can turn a request into a result over the network.
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// One attempt, no retries.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<GenerationResult, ClientError>;
}

/// Calls `POST /api/generate` on a running service.
#[derive(Clone, Debug)]
pub struct HttpCaptionBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCaptionBackend {
    /// `base` is the service root, eg `http://127.0.0.1:9000`.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(base)?.join(GENERATE_PATH)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Same as [`HttpCaptionBackend::new`] with the default timeout.
    pub fn with_default_timeout(base: &str) -> Result<Self, anyhow::Error> {
        Self::new(base, DEFAULT_CLIENT_TIMEOUT)
    }
}

#[async_trait]
impl CaptionBackend for HttpCaptionBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ClientError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&request.to_body())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let result: GenerationResult = resp.json().await?;
        check_result(result)
    }
}

/// A usable result has a caption and one image per prompt, [`IMAGE_PROMPT_COUNT`] of each.
fn check_result(result: GenerationResult) -> Result<GenerationResult, ClientError> {
    if result.caption.is_empty() {
        return Err(ClientError::Decode("response has no caption".to_string()));
    }
    if result.image_prompts.len() != IMAGE_PROMPT_COUNT
        || result.images.len() != result.image_prompts.len()
    {
        return Err(ClientError::Decode(format!(
            "expected {} images and prompts, got {} images and {} prompts",
            IMAGE_PROMPT_COUNT,
            result.images.len(),
            result.image_prompts.len()
        )));
    }
    Ok(result)
}

/// Which path produced a result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationPath {
    /// The generation service answered
    Network,
    /// The offline generator stood in
    Fallback,
}

impl GenerationPath {
    /// Points awarded for taking this path.
    pub fn points(self) -> u64 {
        match self {
            GenerationPath::Network => POINTS_NETWORK_GENERATION,
            GenerationPath::Fallback => POINTS_FALLBACK_GENERATION,
        }
    }
}

/// A result and where it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Generated {
    /// What to show
    pub result: GenerationResult,
    /// Which path ran
    pub path: GenerationPath,
    /// Score after the award
    pub score: u64,
}

/// Produces a result from the backend, or locally when it can't.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn CaptionBackend>,
    images: ImageEndpoint,
    score: Arc<dyn ScoreStore>,
}

impl Orchestrator {
    /// Wires the collaborators together.
    pub fn new(
        backend: Arc<dyn CaptionBackend>,
        images: ImageEndpoint,
        score: Arc<dyn ScoreStore>,
    ) -> Self {
        Self {
            backend,
            images,
            score,
        }
    }

    /// Runs exactly one of the two paths without touching the score.
    pub async fn resolve(&self, request: &GenerationRequest) -> (GenerationResult, GenerationPath) {
        match self.backend.generate(request).await {
            Ok(result) => (result, GenerationPath::Network),
            Err(err) => {
                warn!("Using offline fallback: {}", err);
                (self.fallback_result(&request.idea), GenerationPath::Fallback)
            }
        }
    }

    /// Generates a result for `request`, falling back to the offline generator on any
    /// failure, and awards the points for the path taken.
    pub async fn generate(&self, request: &GenerationRequest) -> Generated {
        let (result, path) = self.resolve(request).await;

        let score = self.award(path.points()).await;
        info!(?path, score, "Caption generated");
        Generated {
            result,
            path,
            score,
        }
    }

    /// Fresh URLs for the prompts already in `result`, nothing else changes.
    /// Without prompts the current images are kept.
    pub fn regenerate_images(&self, result: &GenerationResult) -> GenerationResult {
        if result.image_prompts.is_empty() {
            return result.clone();
        }
        GenerationResult {
            images: self.images.urls_for(&result.image_prompts),
            ..result.clone()
        }
    }

    fn fallback_result(&self, idea: &str) -> GenerationResult {
        let draft = fallback::generate(idea);
        GenerationResult {
            caption: draft.caption,
            images: self.images.urls_for(&draft.image_prompts),
            image_prompts: draft.image_prompts,
        }
    }

    /// Current score, zero when it can't be read.
    pub async fn score(&self) -> u64 {
        match self.score.load().await {
            Ok(points) => points,
            Err(err) => {
                warn!("Failed to read score: {}", err);
                0
            }
        }
    }

    /// Adds points, a storage failure costs the user points but nothing else.
    pub(crate) async fn award(&self, amount: u64) -> u64 {
        match self.score.award(amount).await {
            Ok(total) => total,
            Err(err) => {
                warn!("Failed to record {} points: {}", amount, err);
                self.score.load().await.unwrap_or(0)
            }
        }
    }
}
