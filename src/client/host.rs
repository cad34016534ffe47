//! Capabilities the host platform provides to the mini app.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

/// What gets handed to the native composer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ComposeCast {
    /// Post text
    pub text: String,
    /// Remote image URLs to attach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<String>>,
}

impl ComposeCast {
    /// Builds a cast for `caption`, attaching `image` only when it's a remote URL.
    pub fn new(caption: &str, image: Option<&str>) -> Self {
        let embeds = image
            .filter(|image| !is_local_image(image))
            .map(|image| vec![image.to_string()]);
        Self {
            text: caption.to_string(),
            embeds,
        }
    }
}

/// Images that only exist on this device and can't be embedded.
pub fn is_local_image(url: &str) -> bool {
    url.starts_with("blob:") || url.starts_with("file:")
}

/// The host platform's actions.
#[async_trait]
pub trait HostActions: Send + Sync {
    /// Tells the host the app finished loading.
    async fn ready(&self) -> Result<(), anyhow::Error>;

    /// Opens the native composer.
    async fn compose_cast(&self, cast: &ComposeCast) -> Result<(), anyhow::Error>;
}

/// Host for terminals and servers, it only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingHost;

#[async_trait]
impl HostActions for LoggingHost {
    async fn ready(&self) -> Result<(), anyhow::Error> {
        info!("Host: ready");
        Ok(())
    }

    async fn compose_cast(&self, cast: &ComposeCast) -> Result<(), anyhow::Error> {
        info!("Host: opening composer {}", serde_json::to_string(cast)?);
        Ok(())
    }
}
