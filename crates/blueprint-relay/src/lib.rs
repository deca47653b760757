//! Blueprint relay
//!
//! Stateless HTTP relay between the sketch client and an external
//! image-generation model. The relay owns the provider credentials, chooses
//! the system instruction for each request and reshapes the model's answer
//! into the [`GenerateResponse`](blueprint_core::GenerateResponse) envelope.
//!
//! # Usage
//!
//! ```ignore
//! use blueprint_relay::{build_router, spawn, RelayConfig, RelayState};
//!
//! let config = RelayConfig::from_env()?;
//! let state = RelayState::gemini(&config.gemini)?;
//! let router = build_router(state, config.frontend_url.as_deref())?;
//! let (addr, _handle) = spawn(router, "127.0.0.1:0").await?;
//! ```

pub mod config;
pub mod instructions;
pub mod provider;
pub mod server;

pub use config::{ConfigError, GeminiConfig, RelayConfig};
pub use instructions::{effective_prompt, system_instruction};
pub use provider::{
    GeminiProvider, GeneratedImage, ImageJob, ImageProvider, ProviderError, PNG_SIGNATURE,
};
pub use server::{build_router, serve, spawn, RelayError, RelayState};
