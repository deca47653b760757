//! Error types for drawing surface operations

use thiserror::Error;

use crate::shape::AssetId;

/// Errors raised by surfaces and the canvas adapter
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Nothing has been drawn yet
    #[error("Canvas is empty")]
    EmptyCanvas,

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Export would exceed the maximum raster size
    #[error("Drawing too large to export: {width}x{height} px")]
    TooLarge { width: u32, height: u32 },

    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),
}
