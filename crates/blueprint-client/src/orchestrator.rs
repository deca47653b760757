//! Generation request orchestrator
//!
//! Drives one generate action: export the sketch, build the prompt from the
//! session, send a single request to the relay and report the outcome. The
//! session itself is not mutated here; callers fold the returned
//! [`GenerationOutcome`] into it with [`Session::apply`].

use std::sync::atomic::{AtomicBool, Ordering};

use blueprint_canvas::{CanvasAdapter, CanvasError, DrawingSurface, Point, ShapeId};
use blueprint_core::{decode_image, encode_image, GenerateRequest, GenerationOutcome, Session};
use parking_lot::Mutex;

use crate::error::ClientError;
use crate::relay_client::RelayTransport;

/// Where the orchestrator is in the current (or last) generate action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Exporting,
    Requesting,
    Succeeded,
    Failed,
}

/// Token for the single in-flight generate action, released on drop
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct GenerationOrchestrator<S: DrawingSurface, T: RelayTransport> {
    canvas: Mutex<CanvasAdapter<S>>,
    transport: T,
    in_flight: AtomicBool,
    phase: Mutex<GenerationPhase>,
}

impl<S: DrawingSurface, T: RelayTransport> GenerationOrchestrator<S, T> {
    pub fn new(canvas: CanvasAdapter<S>, transport: T) -> Self {
        Self {
            canvas: Mutex::new(canvas),
            transport,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(GenerationPhase::Idle),
        }
    }

    pub fn phase(&self) -> GenerationPhase {
        *self.phase.lock()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `f` against the canvas (drawing, inspection)
    pub fn with_canvas<R>(&self, f: impl FnOnce(&mut CanvasAdapter<S>) -> R) -> R {
        f(&mut self.canvas.lock())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generate (or refine) a design from the current sketch.
    ///
    /// Returns [`GenerationOutcome::Busy`] without side effects while another
    /// call is in flight, and [`GenerationOutcome::EmptyCanvas`] without any
    /// request when nothing has been drawn.
    pub async fn generate(&self, session: &Session) -> GenerationOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::warn!("Generate ignored: a request is already in flight");
            return GenerationOutcome::Busy;
        };

        self.set_phase(GenerationPhase::Exporting);
        let exported = self.canvas.lock().export_current_drawing();
        let png = match exported {
            Ok(png) => png,
            Err(CanvasError::EmptyCanvas) => {
                log::info!("Generate skipped: the canvas is empty");
                self.set_phase(GenerationPhase::Idle);
                return GenerationOutcome::EmptyCanvas;
            }
            Err(e) => return self.fail(format!("Failed to export drawing: {}", e)),
        };

        let request = GenerateRequest {
            image: encode_image(&png),
            mode: session.mode,
            custom_prompt: session.prompt(),
            is_refinement: session.is_refinement,
        };

        self.set_phase(GenerationPhase::Requesting);
        log::info!(
            "Requesting {} {} ({} byte sketch)",
            session.mode,
            if session.is_refinement { "refinement" } else { "design" },
            png.len()
        );

        let result = match self.transport.generate(&request).await {
            Ok(response) => response.into_result(),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(image_base64) => {
                log::info!("Design generated");
                self.set_phase(GenerationPhase::Succeeded);
                GenerationOutcome::Succeeded { image_base64 }
            }
            Err(message) => self.fail(message),
        }
    }

    /// Drop the session's last generated image onto the canvas at `point`
    pub fn place_generated_image(
        &self,
        session: &Session,
        point: Point,
    ) -> Result<ShapeId, ClientError> {
        let image = session
            .last_generated_image
            .as_deref()
            .ok_or(ClientError::NoImage)?;
        let png = decode_image(image)?;

        let mut canvas = self.canvas.lock();
        canvas.set_mode(session.mode);
        Ok(canvas.import_png(&png, point)?)
    }

    /// Clear the canvas and reset the session, keeping its mode
    pub fn clear(&self, session: &Session) -> Session {
        self.canvas.lock().clear_drawing();
        self.set_phase(GenerationPhase::Idle);
        session.clone().clear()
    }

    fn set_phase(&self, phase: GenerationPhase) {
        *self.phase.lock() = phase;
    }

    fn fail(&self, message: String) -> GenerationOutcome {
        log::error!("Generation failed: {}", message);
        self.set_phase(GenerationPhase::Failed);
        GenerationOutcome::Failed { message }
    }
}
