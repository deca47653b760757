//! Relay HTTP server
//!
//! Routes:
//! - `GET /health`: liveness check
//! - `POST /api/generate` (and `POST /generate`): forward a sketch to the image provider
//!
//! Every response, including errors, rejected bodies and unknown routes, is a
//! JSON document. The server keeps no state between requests.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use blueprint_core::constants::{limits, routes};
use blueprint_core::{decode_image, encode_image, GenerateRequest, GenerateResponse, HealthResponse};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::{GeminiConfig, RelayConfig};
use crate::instructions::{effective_prompt, system_instruction};
use crate::provider::{GeminiProvider, GeneratedImage, ImageJob, ImageProvider, ProviderError};

/// Errors that stop the server from starting or running
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Invalid CORS origin: {0}")]
    Cors(String),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Shared state for handlers
#[derive(Clone)]
pub struct RelayState {
    provider: Arc<dyn ImageProvider>,
}

impl RelayState {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// State backed by [`GeminiProvider`]
    pub fn gemini(config: &GeminiConfig) -> Result<Self, RelayError> {
        Ok(Self::new(Arc::new(GeminiProvider::new(config)?)))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

/// Build the relay router.
///
/// `frontend_url` restricts CORS to one origin (with credentials); `None`
/// allows any origin.
pub fn build_router(state: RelayState, frontend_url: Option<&str>) -> Result<Router, RelayError> {
    let generate = Router::new().route(routes::GENERATE, post(generate_handler));

    Ok(Router::new()
        .route(routes::HEALTH, get(health_handler))
        .nest(routes::API_BASE, generate.clone())
        .merge(generate)
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(limits::MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(frontend_url)?)
        .with_state(state))
}

fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer, RelayError> {
    match frontend_url {
        Some(origin) => {
            let origin =
                HeaderValue::from_str(origin).map_err(|_| RelayError::Cors(origin.to_string()))?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true))
        }
        None => Ok(CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)),
    }
}

/// Bind `addr` and serve `router` on a background task
pub async fn spawn(
    router: Router,
    addr: &str,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), RelayError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let local = listener.local_addr()?;

    log::info!("Relay listening on http://{}", local);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            log::error!("Relay server error: {}", e);
        }
    });

    Ok((local, handle))
}

/// Serve until Ctrl-C
pub async fn serve(config: &RelayConfig, state: RelayState) -> Result<(), RelayError> {
    log::info!("Image provider: {}", state.provider_name());
    let router = build_router(state, config.frontend_url.as_deref())?;
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| RelayError::Bind { addr, source })?;

    log::info!("Relay running on http://localhost:{}", config.port);
    log::info!(
        "CORS origin: {}",
        config.frontend_url.as_deref().unwrap_or("*")
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down relay");
        })
        .await?;
    Ok(())
}

// --- Axum Handlers ---

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn not_found_handler() -> (StatusCode, Json<GenerateResponse>) {
    failure(StatusCode::NOT_FOUND, "Not found")
}

async fn generate_handler(
    State(state): State<RelayState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<GenerateResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected generate request: {}", rejection.body_text());
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let image_png = match decode_image(&request.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Rejected generate request: {}", e);
            return failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    log::info!(
        "Generating {} ({}) from {} byte sketch via {}",
        request.mode,
        if request.is_refinement { "refinement" } else { "initial" },
        image_png.len(),
        state.provider.name()
    );

    let job = ImageJob {
        mode: request.mode,
        is_refinement: request.is_refinement,
        system_instruction: system_instruction(request.mode, request.is_refinement).to_string(),
        prompt: effective_prompt(request.mode, request.is_refinement, &request.custom_prompt),
        image_png,
    };

    let result = state
        .provider
        .generate(job)
        .await
        .and_then(GeneratedImage::into_png);

    match result {
        Ok(png) => (StatusCode::OK, Json(GenerateResponse::ok(encode_image(&png)))),
        Err(e) => {
            log::error!("Generation failed: {}", e);
            failure(status_for(&e), e.to_string())
        }
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<GenerateResponse>) {
    (status, Json(GenerateResponse::failure(message)))
}

fn status_for(err: &ProviderError) -> StatusCode {
    match err {
        ProviderError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("Handler panicked: {}", detail);
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PNG_SIGNATURE;
    use async_trait::async_trait;
    use blueprint_core::Mode;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    type Reply = Box<dyn Fn() -> Result<GeneratedImage, ProviderError> + Send + Sync>;

    /// Provider that records jobs and answers with a canned reply
    struct StubProvider {
        jobs: Mutex<Vec<ImageJob>>,
        reply: Reply,
    }

    impl StubProvider {
        fn new(reply: impl Fn() -> Result<GeneratedImage, ProviderError> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                jobs: Mutex::new(Vec::new()),
                reply: Box::new(reply),
            })
        }

        /// Answer with a PNG-signed payload ending in `tail`
        fn returning(tail: &'static [u8]) -> Arc<Self> {
            Self::new(move || {
                Ok(GeneratedImage {
                    bytes: [PNG_SIGNATURE, tail].concat(),
                    mime_type: "image/png".to_string(),
                })
            })
        }

        fn jobs(&self) -> Vec<ImageJob> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        fn name(&self) -> &'static str {
            "Stub"
        }

        async fn generate(&self, job: ImageJob) -> Result<GeneratedImage, ProviderError> {
            self.jobs.lock().unwrap().push(job);
            (self.reply)()
        }
    }

    async fn start(provider: Arc<StubProvider>, frontend_url: Option<&str>) -> String {
        let router = build_router(RelayState::new(provider), frontend_url).unwrap();
        let (addr, _handle) = spawn(router, "127.0.0.1:0").await.unwrap();
        format!("http://{}", addr)
    }

    fn sketch_request(mode: &str) -> Value {
        json!({
            "image": encode_image(b"sketch"),
            "mode": mode,
            "customPrompt": "Create a professional logo design.",
            "isRefinement": false
        })
    }

    #[tokio::test]
    async fn test_health() {
        let base = start(StubProvider::returning(b"x"), None).await;
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), 200);

        let body: HealthResponse = response.json().await.unwrap();
        assert_eq!(body.status, "OK");
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let provider = StubProvider::returning(b"generated-png");
        let base = start(provider.clone(), None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&sketch_request("logo"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: GenerateResponse = response.json().await.unwrap();
        assert_eq!(
            body,
            GenerateResponse::ok(encode_image(&[PNG_SIGNATURE, &b"generated-png"[..]].concat()))
        );

        let jobs = provider.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].mode, Mode::Logo);
        assert_eq!(jobs[0].image_png, b"sketch");
        assert_eq!(jobs[0].prompt, "Create a professional logo design.");
        assert_eq!(jobs[0].system_instruction, system_instruction(Mode::Logo, false));
    }

    #[tokio::test]
    async fn test_generate_alias_route_and_refinement() {
        let provider = StubProvider::returning(b"png");
        let base = start(provider.clone(), None).await;

        let mut request = sketch_request("website");
        request["isRefinement"] = json!(true);
        let response = reqwest::Client::new()
            .post(format!("{}/generate", base))
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let jobs = provider.jobs();
        assert_eq!(jobs[0].mode, Mode::Product);
        assert!(jobs[0].is_refinement);
        assert_eq!(jobs[0].system_instruction, system_instruction(Mode::Product, true));
    }

    #[tokio::test]
    async fn test_rejects_empty_image() {
        let provider = StubProvider::returning(b"png");
        let base = start(provider.clone(), None).await;

        let mut request = sketch_request("logo");
        request["image"] = json!("");
        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let body: GenerateResponse = response.json().await.unwrap();
        assert!(!body.success);
        assert!(body.error.is_some());
        assert!(provider.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unknown_mode_with_json() {
        let provider = StubProvider::returning(b"png");
        let base = start(provider.clone(), None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&sketch_request("poster"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let body: GenerateResponse = response.json().await.unwrap();
        assert!(!body.success);
        assert!(provider.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_malformed_body_with_json() {
        let base = start(StubProvider::returning(b"png"), None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: GenerateResponse = response.json().await.unwrap();
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_upstream_failures() {
        let cases: Vec<(Arc<StubProvider>, u16)> = vec![
            (
                StubProvider::new(|| Err(ProviderError::NoImage("I can't draw that".into()))),
                502,
            ),
            (StubProvider::new(|| Err(ProviderError::Timeout)), 504),
        ];

        for (provider, status) in cases {
            let base = start(provider, None).await;
            let response = reqwest::Client::new()
                .post(format!("{}/api/generate", base))
                .json(&sketch_request("logo"))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), status);

            let body: GenerateResponse = response.json().await.unwrap();
            assert!(!body.success);
            assert!(body.image_base64.is_none());
            assert!(body.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_jpeg_result_returned_as_png() {
        let pixels = [10u8, 120, 240].repeat(8 * 5);
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode(&pixels, 8, 5, image::ColorType::Rgb8)
            .unwrap();
        let provider = StubProvider::new(move || {
            Ok(GeneratedImage {
                bytes: jpeg.clone(),
                mime_type: "image/jpeg".to_string(),
            })
        });
        let base = start(provider, None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&sketch_request("product"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: GenerateResponse = response.json().await.unwrap();
        let png = decode_image(&body.into_result().unwrap()).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 5));
    }

    #[tokio::test]
    async fn test_undecodable_result_is_bad_gateway() {
        let provider = StubProvider::new(|| {
            Ok(GeneratedImage {
                bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
                mime_type: "image/jpeg".to_string(),
            })
        });
        let base = start(provider, None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&sketch_request("logo"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 502);

        let body: GenerateResponse = response.json().await.unwrap();
        assert!(!body.success);
        assert!(body.image_base64.is_none());
    }

    #[tokio::test]
    async fn test_provider_panic_becomes_json() {
        let base = start(StubProvider::new(|| panic!("provider exploded")), None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate", base))
            .json(&sketch_request("logo"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        let body: GenerateResponse = response.json().await.unwrap();
        assert_eq!(body.error.as_deref(), Some("Internal server error"));

        // The server keeps serving
        let health = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(health.status(), 200);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json() {
        let base = start(StubProvider::returning(b"png"), None).await;
        let response = reqwest::get(format!("{}/nope", base)).await.unwrap();
        assert_eq!(response.status(), 404);
        let body: GenerateResponse = response.json().await.unwrap();
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_cors_origin() {
        let base = start(StubProvider::returning(b"png"), Some("https://blueprint.example")).await;
        let response = reqwest::Client::new()
            .get(format!("{}/health", base))
            .header("origin", "https://blueprint.example")
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://blueprint.example"
        );
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_gemini_state() {
        let config = GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            request_timeout: std::time::Duration::from_secs(5),
        };
        let state = RelayState::gemini(&config).unwrap();
        assert_eq!(state.provider_name(), "Gemini");

        let router = build_router(state, None).unwrap();
        let (addr, _handle) = spawn(router, "127.0.0.1:0").await.unwrap();
        let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(health.status(), 200);
    }

    #[test]
    fn test_provider_setup_error() {
        let err = RelayError::from(ProviderError::InvalidResponse("bad client".to_string()));
        assert!(matches!(err, RelayError::Provider(_)));
        assert_eq!(
            err.to_string(),
            "Provider setup failed: Invalid provider response: bad client"
        );
    }

    #[test]
    fn test_invalid_cors_origin() {
        let state = RelayState::new(StubProvider::returning(b"png"));
        assert!(matches!(
            build_router(state, Some("bad\norigin")),
            Err(RelayError::Cors(_))
        ));
    }
}
