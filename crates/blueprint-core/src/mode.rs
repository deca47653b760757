//! Generation modes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The generation target selected by the user
///
/// Selects which field set and which prompt template apply. Older clients send
/// `"website"` for product photos, so that name is accepted on the wire too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Product photoshoot from a sketch
    #[default]
    #[serde(alias = "website")]
    Product,
    /// Logo design from a sketch
    Logo,
}

impl Mode {
    /// All modes, in display order
    pub const ALL: [Mode; 2] = [Mode::Product, Mode::Logo];

    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Product => "product",
            Mode::Logo => "logo",
        }
    }

    /// Human-readable label of what the mode generates
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Product => "Product Image",
            Mode::Logo => "Logo",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "website" => Ok(Mode::Product),
            "logo" => Ok(Mode::Logo),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}
