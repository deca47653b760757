//! Pluggable image provider abstraction
//!
//! The relay forwards every generation to an [`ImageProvider`]. Providers are
//! HTTP clients of an external generative-image API; tests substitute stubs.

pub mod gemini;

use async_trait::async_trait;
use blueprint_core::Mode;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;

pub use gemini::GeminiProvider;

/// Error types for provider operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image model did not respond in time")]
    Timeout,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The model answered without an image, usually with an explanation
    #[error("Image model returned no image: {0}")]
    NoImage(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Map a transport error, separating timeouts
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(err)
        }
    }
}

/// One generation request as seen by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub mode: Mode,
    pub is_refinement: bool,
    /// How the model should treat the attached sketch
    pub system_instruction: String,
    /// What to draw
    pub prompt: String,
    /// PNG bytes of the sketch
    pub image_png: Vec<u8>,
}

/// First eight bytes of every PNG file
pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Image returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    /// PNG bytes of the image.
    ///
    /// PNG payloads pass through untouched; other formats (JPEG, WebP, ...)
    /// are decoded and re-encoded as RGBA PNG.
    pub fn into_png(self) -> Result<Vec<u8>, ProviderError> {
        if self.bytes.starts_with(PNG_SIGNATURE) {
            return Ok(self.bytes);
        }

        let decoded = image::load_from_memory(&self.bytes)
            .map_err(|e| {
                ProviderError::InvalidResponse(format!(
                    "{} image could not be decoded: {}",
                    self.mime_type, e
                ))
            })?
            .to_rgba8();

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                decoded.as_raw(),
                decoded.width(),
                decoded.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| ProviderError::InvalidResponse(format!("PNG encoding failed: {}", e)))?;

        log::info!(
            "Converted {} result ({}x{}) to PNG",
            self.mime_type,
            decoded.width(),
            decoded.height()
        );
        Ok(png)
    }
}

/// The trait all image providers implement
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &'static str;

    /// Generate an image from a sketch and instructions
    async fn generate(&self, job: ImageJob) -> Result<GeneratedImage, ProviderError>;
}
