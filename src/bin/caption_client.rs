use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use magic_caption::client::host::LoggingHost;
use magic_caption::client::session::Session;
use magic_caption::client::{HttpCaptionBackend, Orchestrator};
use magic_caption::config::setup_logging;
use magic_caption::images::ImageEndpoint;
use magic_caption::score::DbScoreStore;
use magic_caption::tone::Tone;

/// Turn an idea into a caption and three candidate images.
///
/// Minimal UX:
///   caption_client "morning coffee run" --tone professional
#[derive(Parser, Debug)]
#[command(name = "caption_client")]
struct Args {
    /// What the post is about
    idea: String,

    /// professional, funny or unhinge
    #[arg(long, default_value = "funny")]
    tone: Tone,

    /// Root of the generation service
    #[arg(long, default_value = "http://127.0.0.1:9000", env = "MAGIC_CAPTION_ENDPOINT")]
    endpoint: String,

    /// Where the score counter is kept
    #[arg(long, default_value = "magic_caption.sqlite", env = "MAGIC_CAPTION_SCORE_DB")]
    score_db: String,

    /// Seconds to wait for the service before using the offline generator
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// Derive a fresh set of images after generating
    #[arg(long)]
    regenerate: bool,

    /// Open the composer with image 1-3, or 0 for text only
    #[arg(long)]
    post: Option<usize>,

    /// Enable debug logging
    #[arg(long, env = "MAGIC_CAPTION_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug).map_err(|err| anyhow!("{err}"))?;

    let backend = HttpCaptionBackend::new(&args.endpoint, Duration::from_secs(args.timeout_secs))
        .with_context(|| format!("Invalid endpoint {}", args.endpoint))?;
    let score = DbScoreStore::open(&args.score_db)
        .await
        .with_context(|| format!("Failed to open {}", args.score_db))?;
    let orchestrator = Orchestrator::new(
        Arc::new(backend),
        ImageEndpoint::pollinations()?,
        Arc::new(score),
    );

    let mut session = Session::new(orchestrator, Arc::new(LoggingHost));
    let starting = session.start().await;

    session.set_tone(args.tone);
    session.set_idea(args.idea);
    let path = session
        .submit()
        .await
        .ok_or_else(|| anyhow!("Nothing to generate, the idea is empty"))?;

    if args.regenerate {
        session.regenerate_images().await;
    }

    let result = session
        .view()
        .result()
        .cloned()
        .ok_or_else(|| anyhow!("No result after generation"))?;

    println!("{}\n", result.caption);
    for (idx, (url, prompt)) in result.images.iter().zip(&result.image_prompts).enumerate() {
        println!("[{}] {}\n    {}", idx + 1, prompt, url);
    }

    if let Some(choice) = args.post {
        let image = match choice {
            0 => None,
            n => Some(
                result
                    .images
                    .get(n - 1)
                    .ok_or_else(|| anyhow!("There is no image {n}"))?
                    .as_str(),
            ),
        };
        session.post(image).await;
    }

    let score = session.score().await;
    eprintln!("Generated via {path:?}, points {starting} -> {score}");
    Ok(())
}
