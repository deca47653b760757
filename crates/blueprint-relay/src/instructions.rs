//! Mode-specific instructions sent to the image model
//!
//! The client prompt describes *what* to draw; these instructions tell the
//! model how to treat the attached sketch.

use blueprint_core::{build_prompt, FieldInputs, Mode};

const PRODUCT_INITIAL: &str = "You are a product photographer and retoucher. The attached image is a rough \
     hand-drawn sketch of a product. Turn it into a photorealistic product photograph that keeps the \
     sketched product's shape, proportions and layout. Treat text written on the sketch as labels or \
     printed text on the product. Return a single finished image.";

const PRODUCT_REFINE: &str = "You are a product photographer and retoucher. The attached image is a \
     previously generated product photo with new sketches and annotations drawn over it. Apply the \
     indicated changes, remove the annotation marks, and keep everything that was not marked unchanged. \
     Return a single finished image.";

const LOGO_INITIAL: &str = "You are a brand identity designer. The attached image is a rough hand-drawn \
     sketch of a logo. Turn it into a polished, professional logo that keeps the sketched composition \
     and symbols. Use flat vector-style shapes on a plain background, and render any sketched lettering \
     as clean typography. Return a single finished image.";

const LOGO_REFINE: &str = "You are a brand identity designer. The attached image is a previously generated \
     logo with new sketches and annotations drawn over it. Apply the indicated changes, remove the \
     annotation marks, and keep the rest of the logo consistent. Return a single finished image.";

/// System instruction for a mode and pass
pub fn system_instruction(mode: Mode, is_refinement: bool) -> &'static str {
    match (mode, is_refinement) {
        (Mode::Product, false) => PRODUCT_INITIAL,
        (Mode::Product, true) => PRODUCT_REFINE,
        (Mode::Logo, false) => LOGO_INITIAL,
        (Mode::Logo, true) => LOGO_REFINE,
    }
}

/// Prompt to forward: the client's prompt, or the bare template when it sent none
pub fn effective_prompt(mode: Mode, is_refinement: bool, custom_prompt: &str) -> String {
    let trimmed = custom_prompt.trim();
    if trimmed.is_empty() {
        build_prompt(mode, &FieldInputs::default(), is_refinement, "")
    } else {
        trimmed.to_string()
    }
}
