//! Client session state for the generate/refine workflow
//!
//! [`Session`] is a value object: every user action and every generation
//! outcome produces a new session through the reducer methods below, which
//! keeps the workflow testable without a UI.

use std::time::{Duration, Instant};

use crate::constants::timeouts;
use crate::error::CoreError;
use crate::fields::{Field, FieldInputs};
use crate::mode::Mode;
use crate::prompt::build_prompt;

/// Alert raised when generate is triggered on an empty drawing
pub const EMPTY_CANVAS_ALERT: &str = "Please draw something on the canvas first!";

/// Status shown after a successful generation
pub const SUCCESS_STATUS: &str = "Design generated successfully!";

/// Result of one generate attempt, as seen by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Another attempt was already in flight; nothing happened
    Busy,
    /// The drawing was empty; no request was issued
    EmptyCanvas,
    /// The relay returned an image
    Succeeded { image_base64: String },
    /// Network, HTTP or upstream failure
    Failed { message: String },
}

/// Transient status line with an optional expiry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    expires_at: Option<Instant>,
}

impl StatusMessage {
    /// Status that disappears once `ttl` has elapsed from `now`
    pub fn timed(text: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Some(now + ttl),
        }
    }

    /// Raw text, regardless of expiry
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Whether the status should be displayed at `now`
    pub fn is_visible(&self, now: Instant) -> bool {
        !self.text.is_empty() && self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// Everything the client tracks between user actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub mode: Mode,
    /// Field sets of both modes, retained across mode switches
    pub fields: FieldInputs,
    /// Edit instruction typed while in refinement mode
    pub refinement_text: String,
    /// True once a generation has succeeded; the next generate refines it
    pub is_refinement: bool,
    /// Most recent generated image (base64 PNG)
    pub last_generated_image: Option<String>,
    pub status: StatusMessage,
    /// Blocking message for the user, consumed with [`Session::take_alert`]
    pub alert: Option<String>,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Prompt for the next generate action
    pub fn prompt(&self) -> String {
        build_prompt(
            self.mode,
            &self.fields,
            self.is_refinement,
            &self.refinement_text,
        )
    }

    /// Switch modes.
    ///
    /// Drops the generated image, status and refinement state. Field sets of
    /// both modes are kept. Selecting the current mode again changes nothing.
    #[must_use]
    pub fn with_mode(self, mode: Mode) -> Self {
        if mode == self.mode {
            return self;
        }
        Self {
            mode,
            fields: self.fields,
            ..Default::default()
        }
    }

    /// Edit a field of the current mode
    pub fn edit_field(mut self, field: Field, value: impl Into<String>) -> Result<Self, CoreError> {
        self.fields.set(self.mode, field, value)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_refinement_text(mut self, text: impl Into<String>) -> Self {
        self.refinement_text = text.into();
        self
    }

    /// Reset everything except the selected mode
    #[must_use]
    pub fn clear(self) -> Self {
        Self::new(self.mode)
    }

    /// Fold a generation outcome into the session
    #[must_use]
    pub fn apply(mut self, outcome: &GenerationOutcome, now: Instant) -> Self {
        match outcome {
            GenerationOutcome::Busy => {}
            GenerationOutcome::EmptyCanvas => {
                self.alert = Some(EMPTY_CANVAS_ALERT.to_string());
            }
            GenerationOutcome::Succeeded { image_base64 } => {
                self.last_generated_image = Some(image_base64.clone());
                self.is_refinement = true;
                self.status = StatusMessage::timed(
                    SUCCESS_STATUS,
                    now,
                    Duration::from_secs(timeouts::STATUS_SUCCESS_SECS),
                );
            }
            GenerationOutcome::Failed { message } => {
                self.status = StatusMessage::timed(
                    format!("Error: {}", message),
                    now,
                    Duration::from_secs(timeouts::STATUS_ERROR_SECS),
                );
            }
        }
        self
    }

    /// Status text to display at `now`; empty once it has expired
    pub fn status_text(&self, now: Instant) -> &str {
        if self.status.is_visible(now) {
            self.status.text()
        } else {
            ""
        }
    }

    /// Drop the status message if it has expired
    #[must_use]
    pub fn expire_status(mut self, now: Instant) -> Self {
        if !self.status.is_visible(now) {
            self.status = StatusMessage::default();
        }
        self
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn succeeded(image: &str) -> GenerationOutcome {
        GenerationOutcome::Succeeded {
            image_base64: image.to_string(),
        }
    }

    #[test]
    fn test_success_enters_refinement() {
        let now = Instant::now();
        let session = Session::new(Mode::Logo).apply(&succeeded("abc123"), now);

        assert_eq!(session.last_generated_image.as_deref(), Some("abc123"));
        assert!(session.is_refinement);
        assert_eq!(session.status_text(now), SUCCESS_STATUS);

        let later = now + Duration::from_secs(timeouts::STATUS_SUCCESS_SECS);
        assert_eq!(session.status_text(later), "");
        let session = session.expire_status(later);
        assert_eq!(session.status, StatusMessage::default());
    }

    #[test]
    fn test_failure_keeps_previous_image() {
        let now = Instant::now();
        let session = Session::new(Mode::Product)
            .apply(&succeeded("first"), now)
            .apply(
                &GenerationOutcome::Failed {
                    message: "quota exceeded".into(),
                },
                now,
            );

        assert_eq!(session.last_generated_image.as_deref(), Some("first"));
        assert!(session.is_refinement);
        assert_eq!(session.status_text(now), "Error: quota exceeded");

        // Error messages outlive success messages
        let after_success_window = now + Duration::from_secs(timeouts::STATUS_SUCCESS_SECS);
        assert_eq!(session.status_text(after_success_window), "Error: quota exceeded");
        let after_error_window = now + Duration::from_secs(timeouts::STATUS_ERROR_SECS);
        assert_eq!(session.status_text(after_error_window), "");
    }

    #[test]
    fn test_failure_does_not_enter_refinement() {
        let session = Session::default().apply(
            &GenerationOutcome::Failed {
                message: "offline".into(),
            },
            Instant::now(),
        );
        assert!(!session.is_refinement);
        assert!(session.last_generated_image.is_none());
    }

    #[test]
    fn test_success_overwrites_image() {
        let now = Instant::now();
        let session = Session::default()
            .apply(&succeeded("one"), now)
            .apply(&succeeded("two"), now);
        assert_eq!(session.last_generated_image.as_deref(), Some("two"));
    }

    #[test]
    fn test_empty_canvas_raises_alert() {
        let mut session = Session::default().apply(&GenerationOutcome::EmptyCanvas, Instant::now());
        assert_eq!(session.take_alert().as_deref(), Some(EMPTY_CANVAS_ALERT));
        assert!(session.take_alert().is_none());
        assert!(!session.is_refinement);
    }

    #[test]
    fn test_busy_is_noop() {
        let before = Session::new(Mode::Logo).with_refinement_text("x");
        let after = before.clone().apply(&GenerationOutcome::Busy, Instant::now());
        assert_eq!(before, after);
    }

    #[test]
    fn test_mode_switch_resets_results_keeps_fields() {
        let now = Instant::now();
        let session = Session::new(Mode::Logo)
            .edit_field(Field::Purpose, "bakery")
            .unwrap()
            .with_refinement_text("bigger")
            .apply(&succeeded("img"), now);

        let switched = session.with_mode(Mode::Product);
        assert_eq!(switched.mode, Mode::Product);
        assert!(!switched.is_refinement);
        assert!(switched.last_generated_image.is_none());
        assert_eq!(switched.refinement_text, "");
        assert_eq!(switched.status_text(now), "");
        assert_eq!(switched.fields.logo.purpose, "bakery");

        let back = switched.with_mode(Mode::Logo);
        assert_eq!(back.fields.logo.purpose, "bakery");
    }

    #[test]
    fn test_same_mode_is_not_a_switch() {
        let session = Session::new(Mode::Logo).apply(&succeeded("img"), Instant::now());
        let same = session.clone().with_mode(Mode::Logo);
        assert_eq!(session, same);
    }

    #[test]
    fn test_clear_resets_everything_but_mode() {
        let session = Session::new(Mode::Logo)
            .edit_field(Field::Font, "script")
            .unwrap()
            .apply(&succeeded("img"), Instant::now())
            .clear();
        assert_eq!(session, Session::new(Mode::Logo));
    }

    #[test]
    fn test_prompt_follows_refinement_flag() {
        let session = Session::new(Mode::Logo)
            .edit_field(Field::Purpose, "bakery")
            .unwrap();
        assert!(session.prompt().contains("This logo is for: bakery."));

        let refined = session
            .apply(&succeeded("img"), Instant::now())
            .with_refinement_text("add steam");
        let prompt = refined.prompt();
        assert!(prompt.contains("Desired edit: add steam."));
        assert!(!prompt.contains("bakery"));
    }

    #[test]
    fn test_edit_field_outside_mode() {
        assert!(Session::new(Mode::Product).edit_field(Field::Font, "x").is_err());
    }
}
