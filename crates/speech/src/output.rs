use std::sync::Arc;

use tracing::warn;

use crate::error::SynthesisError;

/// Seam for a host-provided text-to-speech engine.
pub trait SynthesisEngine: Send + Sync {
    /// Begin speaking the text at the engine's fixed normal rate.
    ///
    /// # Errors
    ///
    /// Returns `SynthesisError` when the engine fails to start the utterance.
    fn speak(&self, text: &str) -> Result<(), SynthesisError>;

    /// Stop any currently playing or queued utterance.
    fn cancel(&self);
}

/// One-shot "speak the current question" playback.
///
/// Write-only: the adapter holds no state callers need to inspect and
/// consumes no completion callback. Every `speak` unconditionally cancels
/// whatever was playing before starting the new utterance.
#[derive(Clone)]
pub struct SpeechOutput {
    engine: Option<Arc<dyn SynthesisEngine>>,
}

impl SpeechOutput {
    #[must_use]
    pub fn new(engine: Arc<dyn SynthesisEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Adapter for a host without a synthesizer; `speak` becomes a no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self { engine: None }
    }

    /// Cancel any prior utterance and speak `text`. No-op on empty text.
    ///
    /// Fire-and-forget: engine failures are logged and swallowed.
    pub fn speak(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(engine) = &self.engine else {
            return;
        };
        engine.cancel();
        if let Err(err) = engine.speak(text) {
            warn!(error = %err, "speech synthesis failed to start");
        }
    }
}
