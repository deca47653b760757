//! Prompt construction for initial generation and refinement passes
//!
//! Prompts are built from fixed sentences plus one clause per non-empty field,
//! in the order given by [`Field::for_mode`]. Blank fields contribute nothing.

use crate::fields::{Field, FieldInputs};
use crate::mode::Mode;

/// Fixed sentences used by the prompt templates
pub mod templates {
    pub const PRODUCT_OPENING: &str =
        "Create a high-quality and professional product photoshoot of the product in the image.";
    pub const PRODUCT_CLOSING: &str = "It should be with proper lighting and composition, and modern design elements. \
         Include realistic content placeholders and maintain good visual hierarchy.";

    pub const LOGO_OPENING: &str = "Create a professional logo design.";
    pub const LOGO_QUALITY: &str = "Make it clean, scalable, and brand-ready. \
         Use high-quality vector-style design with precise lines and professional composition.";
    pub const LOGO_CLOSING: &str =
        "Ensure the logo has good contrast, and follows modern logo design principles.";

    pub const REFINE_OPENING: &str = "Based on the previous generated design/image, refine it according to the \
         new sketches and annotations drawn over it. Replace the markings, and edit with new elements as desired.";
    pub const REFINE_CLOSING: &str = "Focus on the areas where changes are indicated.";
}

/// Build the prompt sent alongside the sketch.
///
/// In refinement mode the field sets are ignored entirely; only the optional
/// `refinement_text` is appended to the fixed edit instruction.
pub fn build_prompt(
    mode: Mode,
    fields: &FieldInputs,
    is_refinement: bool,
    refinement_text: &str,
) -> String {
    let mut prompt = PromptWriter::default();

    if is_refinement {
        prompt.sentence(templates::REFINE_OPENING);
        prompt.clause(refinement_text, |edit| format!("Desired edit: {}.", edit));
        prompt.sentence(templates::REFINE_CLOSING);
        return prompt.finish();
    }

    match mode {
        Mode::Product => {
            prompt.sentence(templates::PRODUCT_OPENING);
            for field in Field::for_mode(mode) {
                let value = fields.get(mode, *field).unwrap_or_default();
                match field {
                    Field::Purpose => {
                        prompt.clause(value, |v| format!("The product photo is for: {}.", v))
                    }
                    Field::BackgroundType => prompt.clause(value, |v| {
                        format!("The Background and Setting should be: {}.", v)
                    }),
                    Field::ColorScheme => {
                        prompt.clause(value, |v| format!("Use a {} color scheme.", v))
                    }
                    Field::CameraAngle => {
                        prompt.clause(value, |v| format!("Camera Angle should be: {}.", v))
                    }
                    Field::AdditionalDetails => {
                        prompt.clause(value, |v| format!("Additional requirements: {}.", v))
                    }
                    Field::Font => {}
                }
            }
            prompt.sentence(templates::PRODUCT_CLOSING);
        }
        Mode::Logo => {
            prompt.sentence(templates::LOGO_OPENING);
            for field in Field::for_mode(mode) {
                let value = fields.get(mode, *field).unwrap_or_default();
                match field {
                    Field::Purpose => prompt.clause(value, |v| format!("This logo is for: {}.", v)),
                    Field::ColorScheme => {
                        prompt.clause(value, |v| format!("Use a {} color scheme.", v))
                    }
                    Field::Font => prompt.clause(value, |v| format!("Typography style: {}.", v)),
                    Field::AdditionalDetails => {
                        // Quality modifiers sit between the styling clauses and free-form extras
                        prompt.sentence(templates::LOGO_QUALITY);
                        prompt.clause(value, |v| format!("Additional requirements: {}.", v));
                    }
                    Field::BackgroundType | Field::CameraAngle => {}
                }
            }
            prompt.sentence(templates::LOGO_CLOSING);
        }
    }

    prompt.finish()
}

/// Accumulates space-separated sentences
#[derive(Default)]
struct PromptWriter {
    out: String,
}

impl PromptWriter {
    fn sentence(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    fn clause(&mut self, value: &str, render: impl FnOnce(&str) -> String) {
        if let Some(value) = clause_value(value) {
            self.sentence(&render(&value));
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Normalize a free-text value for interpolation.
///
/// Collapses whitespace runs and drops trailing periods so the rendered clause
/// never ends in `..`. Returns `None` when nothing is left.
fn clause_value(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
