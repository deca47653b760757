//! Gemini image provider
//!
//! Calls the Generative Language API `generateContent` endpoint with the
//! sketch attached as inline data and asks for an image back.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

use super::{GeneratedImage, ImageJob, ImageProvider, ProviderError};
use crate::config::GeminiConfig;

/// Gemini image provider using the Generative Language REST API
pub struct GeminiProvider {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiProvider {
    /// Create a provider; the request timeout is applied to every call
    pub fn new(config: &GeminiConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
        })
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// JSON body for a job
    pub fn request_body(job: &ImageJob) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": job.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": job.prompt },
                    {
                        "inlineData": {
                            "mimeType": "image/png",
                            "data": BASE64.encode(&job.image_png),
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            }
        })
    }

    /// Pull the first inline image out of a `generateContent` response.
    ///
    /// When the model only answers with text, that text becomes the error.
    pub fn extract_image(response: &Value) -> Result<GeneratedImage, ProviderError> {
        let candidates = response
            .get("candidates")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut texts = Vec::new();
        for candidate in candidates {
            let parts = candidate
                .get("content")
                .and_then(|c| c.get("parts"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for part in parts {
                let inline = part.get("inlineData").or_else(|| part.get("inline_data"));
                if let Some(inline) = inline {
                    let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
                    if data.is_empty() {
                        continue;
                    }
                    let bytes = BASE64.decode(data.as_bytes()).map_err(|e| {
                        ProviderError::InvalidResponse(format!("image is not valid base64: {}", e))
                    })?;
                    let mime_type = inline
                        .get("mimeType")
                        .or_else(|| inline.get("mime_type"))
                        .and_then(Value::as_str)
                        .unwrap_or("image/png")
                        .to_string();
                    return Ok(GeneratedImage { bytes, mime_type });
                }
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    if !text.trim().is_empty() {
                        texts.push(text.trim().to_string());
                    }
                }
            }
        }

        if let Some(reason) = response
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
        {
            return Err(ProviderError::NoImage(format!("prompt blocked ({})", reason)));
        }

        if texts.is_empty() {
            Err(ProviderError::NoImage("empty response".to_string()))
        } else {
            Err(ProviderError::NoImage(texts.join(" ")))
        }
    }

    /// Best-effort message from an API error body
    fn api_error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, job: ImageJob) -> Result<GeneratedImage, ProviderError> {
        let url = self.endpoint();
        log::debug!("POST {} ({} byte sketch)", url, job.image_png.len());

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&job))
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: Self::api_error_message(&body),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let image = Self::extract_image(&json)?;
        log::info!(
            "{} returned {} bytes ({})",
            self.name(),
            image.bytes.len(),
            image.mime_type
        );
        Ok(image)
    }
}
