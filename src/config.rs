//! Config handling

use std::sync::Arc;

use tracing::log::LevelFilter;
use tracing::warn;

use crate::cli::CliOptions;
use crate::gemini::{GeminiClient, GeminiConfig, TextModel};
use crate::images::ImageEndpoint;
use crate::web::AppState;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info)
            .with_module_level("sea_orm", LevelFilter::Warn)
            .with_module_level("sqlx", LevelFilter::Warn);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Builds the server state from the command line.
///
/// A missing API key isn't fatal here, the endpoint answers with a generic
/// server error until one is configured.
pub fn app_state(cli: &CliOptions) -> Result<AppState, anyhow::Error> {
    let model: Option<Arc<dyn TextModel>> = match cli.gemini_api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            let config = GeminiConfig {
                model: cli.model.clone(),
                base_url: cli.gemini_base_url.clone(),
                timeout: std::time::Duration::from_secs(cli.upstream_timeout_secs),
                ..GeminiConfig::new(key.trim())
            };
            Some(Arc::new(GeminiClient::new(config)?) as Arc<dyn TextModel>)
        }
        _ => {
            warn!("GEMINI_API_KEY is not set, generation requests will fail");
            None
        }
    };
    Ok(AppState::new(model, ImageEndpoint::pollinations()?))
}
