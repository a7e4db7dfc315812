//! Status machine around the pipeline: one generation at a time, one result
//! or one error kept for display.

use crate::{
    error::{Result, SmartMatchError},
    models::{AppError, GeneratedResult, GenerationStatus, Style},
    pipeline::GenerationPipeline,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use uuid::Uuid;

const STATUS_CHANNEL_CAPACITY: usize = 16;

pub const INTERRUPTED_MESSAGE: &str = "Generation was interrupted. Please try again.";

#[derive(Debug, Default)]
struct SessionState {
    status: GenerationStatus,
    result: Option<GeneratedResult>,
    error: Option<AppError>,
}

pub struct GenerationSession {
    pipeline: GenerationPipeline,
    state: Mutex<SessionState>,
    status_tx: broadcast::Sender<GenerationStatus>,
}

impl GenerationSession {
    pub fn new(pipeline: GenerationPipeline) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            pipeline,
            state: Mutex::new(SessionState::default()),
            status_tx,
        }
    }

    pub fn status(&self) -> GenerationStatus {
        self.lock().status
    }

    pub fn result(&self) -> Option<GeneratedResult> {
        self.lock().result.clone()
    }

    pub fn error(&self) -> Option<AppError> {
        self.lock().error.clone()
    }

    /// Every status transition from now on, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationStatus> {
        self.status_tx.subscribe()
    }

    /// Runs the full pipeline for `text` (trimmed). Rejected without touching
    /// state when the text is blank or another generation is in flight.
    pub async fn generate(&self, text: &str, style: Style) -> Result<GeneratedResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SmartMatchError::EmptyInput);
        }
        self.begin()?;
        let in_flight = InFlight::new(self);

        let generation_id = Uuid::new_v4().simple().to_string();
        let generation_id = &generation_id[..8];
        log::info!(
            "[gen:{}] Generating image for {} chars, style {}",
            generation_id,
            text.chars().count(),
            style
        );

        let prompt = match self.pipeline.optimize(text, style).await {
            Ok(prompt) => prompt,
            Err(e) => return Err(in_flight.fail(e)),
        };
        log::debug!("[gen:{}] Optimized prompt: {}", generation_id, prompt);
        self.transition(|state| state.status = GenerationStatus::Generating);

        let image = match self.pipeline.render(&prompt).await {
            Ok(image) => image,
            Err(e) => return Err(in_flight.fail(e)),
        };

        let result = GeneratedResult::new(text, prompt, &image, style);
        let stored = result.clone();
        in_flight.disarm();
        self.transition(move |state| {
            state.result = Some(stored);
            state.status = GenerationStatus::Success;
        });
        log::info!("[gen:{}] Generation succeeded", generation_id);
        Ok(result)
    }

    /// Re-runs both stages with the last result's text and style.
    pub async fn retry(&self) -> Result<GeneratedResult> {
        let previous = self.result().ok_or(SmartMatchError::NothingToRetry)?;
        self.generate(&previous.original_text, previous.style).await
    }

    fn begin(&self) -> Result<()> {
        let mut state = self.lock();
        if state.status.is_processing() {
            log::warn!("Generation requested while {} is in progress", state.status);
            return Err(SmartMatchError::Busy);
        }
        state.status = GenerationStatus::Optimizing;
        state.result = None;
        state.error = None;
        drop(state);
        self.notify(GenerationStatus::Optimizing);
        Ok(())
    }

    fn fail(&self, err: SmartMatchError) -> SmartMatchError {
        let app_error = AppError::from(&err);
        self.transition(move |state| {
            state.error = Some(app_error);
            state.status = GenerationStatus::Error;
        });
        err
    }

    fn transition(&self, apply: impl FnOnce(&mut SessionState)) {
        let status = {
            let mut state = self.lock();
            apply(&mut state);
            state.status
        };
        self.notify(status);
    }

    fn notify(&self, status: GenerationStatus) {
        log::debug!("Status -> {}", status);
        // no subscribers is fine
        let _ = self.status_tx.send(status);
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one `generate` call. If the future is dropped
/// mid-stage the session is moved to `Error` instead of staying busy forever.
struct InFlight<'a> {
    session: &'a GenerationSession,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(session: &'a GenerationSession) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }

    fn fail(self, err: SmartMatchError) -> SmartMatchError {
        let session = self.session;
        self.disarm();
        session.fail(err)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        log::warn!("Generation dropped before completing");
        self.session.transition(|state| {
            state.error = Some(AppError::new(INTERRUPTED_MESSAGE));
            state.status = GenerationStatus::Error;
        });
    }
}
