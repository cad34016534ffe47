//! Shared constants/setters for things
//!

use std::time::Duration;

/// Path the generation endpoint is served on
pub const GENERATE_PATH: &str = "/api/generate";

/// Base of the public image rendering endpoint, the prompt is appended as a path segment.
pub const IMAGE_BASE_URL: &str = "https://pollinations.ai/p/";

/// Appended to every image prompt before it's rendered.
pub const IMAGE_QUALITY_SUFFIX: &str = ", photorealistic, 8k, cinematic lighting";

/// Rendered image width in pixels.
pub const IMAGE_WIDTH: u32 = 1080;

/// Rendered image height in pixels.
pub const IMAGE_HEIGHT: u32 = 1080;

/// Exclusive upper bound for image seeds.
pub const IMAGE_SEED_UPPER_BOUND: u32 = 99_999;

/// Renderer model passed to the image endpoint.
pub const IMAGE_RENDER_MODEL: &str = "flux";

/// Number of image prompts every result carries.
pub const IMAGE_PROMPT_COUNT: usize = 3;

/// Default upstream model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default upstream API base.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// How long the server waits for the upstream model.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the client waits for the generation endpoint before falling back.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Name the score counter is stored under.
pub const SCORE_COUNTER_NAME: &str = "magicCaptionPoints";

/// Points for a caption generated by the service.
pub const POINTS_NETWORK_GENERATION: u64 = 10;

/// Points for a caption generated by the offline fallback.
pub const POINTS_FALLBACK_GENERATION: u64 = 5;

/// Points for opening the composer with a result.
pub const POINTS_POST: u64 = 10;
