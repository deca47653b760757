//! Blueprint client
//!
//! Client side of the sketch-to-design workflow:
//! - **ClientConfig**: relay URL and timeout from the environment
//! - **HttpRelayClient**: posts generate requests to the relay
//! - **GenerationOrchestrator**: export, request and outcome handling with a
//!   single in-flight guard
//! - **download**: writes the generated PNG to disk
//!
//! UI state lives in [`blueprint_core::Session`]; the orchestrator returns
//! outcomes that are folded into it with `Session::apply`.

pub mod config;
pub mod download;
pub mod error;
pub mod orchestrator;
pub mod relay_client;

// Re-exports for convenience
pub use config::ClientConfig;
pub use download::{download_bytes, download_file_name, save_download};
pub use error::ClientError;
pub use orchestrator::{GenerationOrchestrator, GenerationPhase};
pub use relay_client::{HttpRelayClient, RelayTransport};
