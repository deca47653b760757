//! Per-mode free-text inputs
//!
//! Each mode keeps its own field set. Both are held in [`FieldInputs`] so that
//! switching modes does not lose what was typed for the other one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::mode::Mode;

/// Named attribute of a field set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Purpose,
    ColorScheme,
    BackgroundType,
    CameraAngle,
    Font,
    AdditionalDetails,
}

impl Field {
    /// Fields of a mode, in prompt order
    pub fn for_mode(mode: Mode) -> &'static [Field] {
        match mode {
            Mode::Product => &[
                Field::Purpose,
                Field::BackgroundType,
                Field::ColorScheme,
                Field::CameraAngle,
                Field::AdditionalDetails,
            ],
            Mode::Logo => &[
                Field::Purpose,
                Field::ColorScheme,
                Field::Font,
                Field::AdditionalDetails,
            ],
        }
    }

    /// Whether the field belongs to the mode's field set
    pub fn applies_to(&self, mode: Mode) -> bool {
        Self::for_mode(mode).contains(self)
    }

    /// camelCase name used by the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Purpose => "purpose",
            Field::ColorScheme => "colorScheme",
            Field::BackgroundType => "backgroundType",
            Field::CameraAngle => "cameraAngle",
            Field::Font => "font",
            Field::AdditionalDetails => "additionalDetails",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for product photoshoots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFields {
    /// What the product photo is for
    pub purpose: String,
    pub color_scheme: String,
    /// Background and setting of the shot
    pub background_type: String,
    pub camera_angle: String,
    pub additional_details: String,
}

/// Inputs for logo designs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoFields {
    /// What the logo is for
    pub purpose: String,
    /// Typography style
    pub font: String,
    pub color_scheme: String,
    pub additional_details: String,
}

/// Both field sets, retained independently
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldInputs {
    pub product: ProductFields,
    pub logo: LogoFields,
}

impl FieldInputs {
    /// Read a field of the given mode
    pub fn get(&self, mode: Mode, field: Field) -> Option<&str> {
        let value = match (mode, field) {
            (Mode::Product, Field::Purpose) => &self.product.purpose,
            (Mode::Product, Field::ColorScheme) => &self.product.color_scheme,
            (Mode::Product, Field::BackgroundType) => &self.product.background_type,
            (Mode::Product, Field::CameraAngle) => &self.product.camera_angle,
            (Mode::Product, Field::AdditionalDetails) => &self.product.additional_details,
            (Mode::Logo, Field::Purpose) => &self.logo.purpose,
            (Mode::Logo, Field::ColorScheme) => &self.logo.color_scheme,
            (Mode::Logo, Field::Font) => &self.logo.font,
            (Mode::Logo, Field::AdditionalDetails) => &self.logo.additional_details,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Overwrite a field of the given mode
    pub fn set(&mut self, mode: Mode, field: Field, value: impl Into<String>) -> Result<(), CoreError> {
        let slot = match (mode, field) {
            (Mode::Product, Field::Purpose) => &mut self.product.purpose,
            (Mode::Product, Field::ColorScheme) => &mut self.product.color_scheme,
            (Mode::Product, Field::BackgroundType) => &mut self.product.background_type,
            (Mode::Product, Field::CameraAngle) => &mut self.product.camera_angle,
            (Mode::Product, Field::AdditionalDetails) => &mut self.product.additional_details,
            (Mode::Logo, Field::Purpose) => &mut self.logo.purpose,
            (Mode::Logo, Field::ColorScheme) => &mut self.logo.color_scheme,
            (Mode::Logo, Field::Font) => &mut self.logo.font,
            (Mode::Logo, Field::AdditionalDetails) => &mut self.logo.additional_details,
            _ => return Err(CoreError::FieldNotInMode { field, mode }),
        };
        *slot = value.into();
        Ok(())
    }
}
