//! Error types for the directions client.

use thiserror::Error;

/// Generic text reported when the service rejects a request without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The directions service answered but refused to produce a usable route.
///
/// `message` is `None` when the service reported success with no routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("directions service error: {}", .message.as_deref().unwrap_or("no routes returned"))]
pub struct ServiceError {
    pub message: Option<String>,
}

impl ServiceError {
    pub fn rejected(message: Option<String>) -> Self {
        Self {
            message: Some(
                message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
        }
    }

    pub fn no_routes() -> Self {
        Self { message: None }
    }
}

/// The request never produced a readable response.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid or missing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
