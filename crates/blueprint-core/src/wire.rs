//! JSON envelope exchanged between clients and the relay

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::mode::Mode;

/// Body of `POST {base}/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Base64 PNG of the sketch, without a data-URL prefix
    pub image: String,
    pub mode: Mode,
    /// Prompt built on the client
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default)]
    pub is_refinement: bool,
}

/// Response of `POST {base}/generate`
///
/// Either `success` is true and `image_base64` is present, or `success` is
/// false and `error` explains why. Build it through [`GenerateResponse::ok`]
/// and [`GenerateResponse::failure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Successful generation carrying a base64 PNG
    pub fn ok(image_base64: impl Into<String>) -> Self {
        Self {
            success: true,
            image_base64: Some(image_base64.into()),
            error: None,
        }
    }

    /// Failed generation
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_base64: None,
            error: Some(error.into()),
        }
    }

    /// Interpret the envelope.
    ///
    /// `success: true` without a non-empty image is treated as a failure.
    pub fn into_result(self) -> Result<String, String> {
        match (self.success, self.image_base64) {
            (true, Some(image)) if !image.is_empty() => Ok(image),
            (true, _) => Err("Response did not contain an image".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "Unknown error".to_string())),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
}

/// Decode a base64 image payload, rejecting empty input
pub fn decode_image(image_base64: &str) -> Result<Vec<u8>, CoreError> {
    let trimmed = image_base64.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyImage);
    }
    let bytes = BASE64.decode(trimmed.as_bytes())?;
    if bytes.is_empty() {
        return Err(CoreError::EmptyImage);
    }
    Ok(bytes)
}

/// Encode image bytes for the wire
pub fn encode_image(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
