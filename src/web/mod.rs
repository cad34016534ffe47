//! HTTP surface of the caption generation service.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use tracing::{error, info};

use crate::constants::GENERATE_PATH;
use crate::gemini::TextModel;
use crate::images::ImageEndpoint;

mod generate;

use generate::generate_handler;

/// Shared, read-only handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    /// `None` when no provider credential was configured.
    model: Option<Arc<dyn TextModel>>,
    images: ImageEndpoint,
}

impl AppState {
    /// Builds the handler state.
    pub fn new(model: Option<Arc<dyn TextModel>>, images: ImageEndpoint) -> Self {
        Self { model, images }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route(GENERATE_PATH, any(generate_handler))
        .route("/healthz", get(health_handler))
}

/// The application router with its state attached.
pub fn app(state: AppState) -> Router {
    create_router().with_state(state)
}

/// Serves `app` on an already bound listener until it errors.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<(), anyhow::Error> {
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Binds and runs the server.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = serve(listener, state).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
