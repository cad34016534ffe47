//! `POST /api/generate`

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::constants::IMAGE_PROMPT_COUNT;
use crate::error::CaptionError;
use crate::tone::Tone;
use crate::types::{GenerateRequestBody, GenerationRequest, GenerationResult};

use super::AppState;

/// Builds the instruction block sent ahead of the user's idea.
pub(crate) fn system_instruction(tone: Tone) -> String {
    format!(
        r#"You are a viral social post rewriter for a decentralized social platform (Farcaster).
Task: Rewrite the user's idea into a perfect post.
Rules: {}

CRITICAL: You must output valid JSON and nothing else.
Output format: {{ "caption": "your generated text", "image_prompts": ["prompt 1", "prompt 2", "prompt 3"] }}"#,
        tone.instruction()
    )
}

/// The full text sent to the model.
pub(crate) fn model_prompt(request: &GenerationRequest) -> String {
    format!(
        "{}\n\nUser Idea: {}",
        system_instruction(request.tone),
        request.idea
    )
}

#[derive(Debug, Deserialize)]
struct ModelOutput {
    caption: String,
    image_prompts: Vec<String>,
}

/// Parses what the model said, all or nothing.
pub(crate) fn parse_model_output(text: &str) -> Result<(String, Vec<String>), CaptionError> {
    let output: ModelOutput = serde_json::from_str(text.trim())
        .map_err(|err| CaptionError::MalformedPayload(format!("{err}: {text}")))?;
    if output.caption.trim().is_empty() {
        return Err(CaptionError::MalformedPayload("empty caption".to_string()));
    }
    if output.image_prompts.len() != IMAGE_PROMPT_COUNT {
        return Err(CaptionError::MalformedPayload(format!(
            "expected {IMAGE_PROMPT_COUNT} image prompts, got {}",
            output.image_prompts.len()
        )));
    }
    Ok((output.caption, output.image_prompts))
}

#[instrument(level = "info", skip_all, fields(method = %method))]
pub(crate) async fn generate_handler(
    method: Method,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerationResult>, CaptionError> {
    if method != Method::POST {
        return Err(CaptionError::MethodNotAllowed);
    }

    let model = state
        .model
        .as_ref()
        .ok_or_else(|| CaptionError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

    let body: GenerateRequestBody = serde_json::from_slice(&body).map_err(|err| {
        debug!("Unreadable generation body: {}", err);
        CaptionError::BadRequest
    })?;
    let request = GenerationRequest::try_from(body).map_err(|_| CaptionError::BadRequest)?;
    info!(tone = %request.tone, "Generating caption");

    let text = model.generate_json(&model_prompt(&request)).await?;
    let (caption, image_prompts) = parse_model_output(&text)?;
    let images = state.images.urls_for(&image_prompts);

    Ok(Json(GenerationResult {
        caption,
        images,
        image_prompts,
    }))
}
