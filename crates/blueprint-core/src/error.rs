//! Error types for the core crate

use thiserror::Error;

use crate::fields::Field;
use crate::mode::Mode;

/// Errors raised by core domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// The field is not part of the mode's field set
    #[error("Field '{field}' does not apply to {mode} mode")]
    FieldNotInMode { field: Field, mode: Mode },

    /// Unknown mode name
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Image payload is empty
    #[error("Image payload is empty")]
    EmptyImage,

    /// Image payload is not valid base64
    #[error("Invalid base64 image: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}
