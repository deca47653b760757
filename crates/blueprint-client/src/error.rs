//! Client error types

use blueprint_canvas::CanvasError;
use blueprint_core::CoreError;

/// Errors raised while talking to the relay or handling its results
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a non-success HTTP status
    #[error("{message}")]
    Relay { status: u16, message: String },

    /// Relay answered 2xx but reported a failed generation
    #[error("{0}")]
    Upstream(String),

    #[error("Invalid image payload: {0}")]
    InvalidImage(#[from] CoreError),

    #[error("No generated image to use")]
    NoImage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
