//! Core domain types for Blueprint
//!
//! Everything in this crate is pure and synchronous:
//! - **Mode / field sets**: the two generation targets and their free-text inputs
//! - **Prompt builder**: deterministic prompt templating for initial and refinement passes
//! - **Wire types**: the JSON envelope shared by the relay and its clients
//! - **Session**: reducer-style client state for the generate/refine workflow
//!
//! # Example
//!
//! ```rust
//! use blueprint_core::{build_prompt, FieldInputs, Mode};
//!
//! let mut fields = FieldInputs::default();
//! fields.logo.purpose = "coffee shop".into();
//!
//! let prompt = build_prompt(Mode::Logo, &fields, false, "");
//! assert!(prompt.starts_with("Create a professional logo design. This logo is for: coffee shop."));
//! ```

pub mod constants;
pub mod error;
pub mod fields;
pub mod mode;
pub mod prompt;
pub mod session;
pub mod wire;

// Re-exports for convenience
pub use error::CoreError;
pub use fields::{Field, FieldInputs, LogoFields, ProductFields};
pub use mode::Mode;
pub use prompt::build_prompt;
pub use session::{GenerationOutcome, Session, StatusMessage};
pub use wire::{decode_image, encode_image, GenerateRequest, GenerateResponse, HealthResponse};
