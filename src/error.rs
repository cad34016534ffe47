//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

/// definitions for the magic caption service.
#[derive(Debug)]
pub enum CaptionError {
    /// Anything other than a POST hit the generation endpoint
    MethodNotAllowed,
    /// When you didn't send a usable idea
    BadRequest,
    /// The server is missing configuration it needs, eg the provider key
    Configuration(String),
    /// The upstream model couldn't be reached or answered with an error
    Upstream(String),
    /// The upstream model answered but the payload wasn't what we asked for
    MalformedPayload(String),
    /// When DB operations fail
    DatabaseError(sea_orm::DbErr),
}

impl std::fmt::Display for CaptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MethodNotAllowed => write!(f, "Method not allowed"),
            Self::BadRequest => write!(f, "Bad request"),
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::Upstream(msg) => write!(f, "Upstream error: {msg}"),
            Self::MalformedPayload(msg) => write!(f, "Malformed upstream payload: {msg}"),
            Self::DatabaseError(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for CaptionError {}

impl From<sea_orm::DbErr> for CaptionError {
    fn from(err: sea_orm::DbErr) -> Self {
        CaptionError::DatabaseError(err)
    }
}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        CaptionError::Upstream(err.to_string())
    }
}

impl From<url::ParseError> for CaptionError {
    fn from(err: url::ParseError) -> Self {
        CaptionError::Configuration(err.to_string())
    }
}

fn error_body(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for CaptionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            CaptionError::MethodNotAllowed => {
                info!("Rejected non-POST generation request");
                error_body(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }
            CaptionError::BadRequest => {
                info!("Bad request received");
                error_body(StatusCode::BAD_REQUEST, "Bad request")
            }
            CaptionError::Configuration(message) => {
                error!("Configuration error: {}", message);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error",
                )
            }
            CaptionError::Upstream(message) => {
                error!("Upstream error: {}", message);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate content",
                )
            }
            CaptionError::MalformedPayload(message) => {
                error!("Malformed upstream payload: {}", message);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate content",
                )
            }
            CaptionError::DatabaseError(err) => {
                error!("Database error: {}", err);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        }
    }
}
