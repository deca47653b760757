//! `data:` URL encoding for embedded images

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CanvasError;

/// Decoded `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Whether `url` embeds an image payload
pub fn is_image_data_url(url: &str) -> bool {
    url.starts_with("data:image/")
}

/// Parse a base64 `data:` URL. Percent-encoded payloads are not supported.
pub fn parse_data_url(url: &str) -> Result<DataUrl, CanvasError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CanvasError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CanvasError::InvalidDataUrl("missing payload separator".to_string()))?;
    let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
        CanvasError::InvalidDataUrl("only base64 payloads are supported".to_string())
    })?;

    let bytes = BASE64
        .decode(payload.trim().as_bytes())
        .map_err(|e| CanvasError::InvalidDataUrl(e.to_string()))?;

    Ok(DataUrl {
        mime_type: if mime_type.is_empty() {
            "text/plain".to_string()
        } else {
            mime_type.to_string()
        },
        bytes,
    })
}

/// Embed bytes in a base64 `data:` URL
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}
