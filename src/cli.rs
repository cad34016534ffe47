//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

use crate::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "MAGIC_CAPTION_DEBUG")]
    /// Enable debug logging. Env: MAGIC_CAPTION_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "MAGIC_CAPTION_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: MAGIC_CAPTION_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "MAGIC_CAPTION_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: MAGIC_CAPTION_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Provider key for the text model. Env: GEMINI_API_KEY
    pub gemini_api_key: Option<String>,
    #[clap(long, default_value = DEFAULT_GEMINI_MODEL, env = "MAGIC_CAPTION_MODEL")]
    /// Text model name. Env: MAGIC_CAPTION_MODEL
    pub model: String,
    #[clap(long, default_value = DEFAULT_GEMINI_BASE_URL, env = "MAGIC_CAPTION_GEMINI_BASE_URL")]
    /// Text model API base. Env: MAGIC_CAPTION_GEMINI_BASE_URL
    pub gemini_base_url: String,
    #[clap(long, default_value = "30", env = "MAGIC_CAPTION_UPSTREAM_TIMEOUT")]
    /// Seconds to wait for the text model. Env: MAGIC_CAPTION_UPSTREAM_TIMEOUT
    pub upstream_timeout_secs: u64,
}
