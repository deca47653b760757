//! HTTP client for the relay's generate endpoint

use async_trait::async_trait;
use blueprint_core::constants::routes;
use blueprint_core::{GenerateRequest, GenerateResponse};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Something that can carry a generate request to the relay
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send one request. Non-2xx answers are errors; a 2xx envelope is
    /// returned as-is, even when it reports `success: false`.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError>;
}

/// reqwest-backed [`RelayTransport`]
pub struct HttpRelayClient {
    http_client: reqwest::Client,
    /// Base URL of the relay, e.g. `http://localhost:3001`
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, routes::GENERATE)
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let url = self.generate_url();
        log::debug!("POST {} (mode={}, refinement={})", url, request.mode, request.is_refinement);

        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| format!("Failed to generate design (HTTP {})", status));
            return Err(ClientError::Relay { status, message });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }
}
