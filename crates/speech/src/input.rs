use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CaptureError, SpeechInputError};
pub use crate::error::CaptureErrorKind;

/// Seam for a host-provided voice-to-text engine.
///
/// Engines capture one utterance at a time and resolve to the final
/// transcript only; interim results are never requested.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Capture a single utterance and resolve to its final transcript.
    async fn capture(&self) -> Result<String, CaptureError>;

    /// Abort an in-flight capture, discarding any partial result.
    fn cancel(&self) {}
}

/// Adapter state: idle or actively capturing. There is no paused state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
}

/// How one capture attempt resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Final transcript of the utterance. Callers append it to the existing
    /// answer draft (with a single separating space when the draft is
    /// non-empty), never replace the draft.
    Transcript(String),
    /// The engine failed mid-capture; already logged, nothing to surface.
    Failed(CaptureErrorKind),
}

/// Voice-to-text capture behind a start/stop/result contract.
///
/// At most one capture is in flight at a time; the adapter transitions
/// `Idle → Listening → Idle` on result, error, or explicit stop.
pub struct SpeechInput {
    engine: Option<Arc<dyn RecognitionEngine>>,
    state: CaptureState,
}

impl SpeechInput {
    #[must_use]
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self {
            engine: Some(engine),
            state: CaptureState::Idle,
        }
    }

    /// Adapter for a host without any voice-to-text capability.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            engine: None,
            state: CaptureState::Idle,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    /// Capture one utterance, resolving to its outcome.
    ///
    /// Transitions to `Listening` for the duration of the capture and back
    /// to `Idle` however it ends. Engine failures are logged and folded into
    /// [`CaptureOutcome::Failed`]; they are non-fatal to the session.
    ///
    /// # Errors
    ///
    /// Returns `SpeechInputError::UnsupportedEngine` when the host has no
    /// engine and `SpeechInputError::CaptureInFlight` when called while
    /// already listening (a caller precondition violation).
    pub async fn capture(&mut self) -> Result<CaptureOutcome, SpeechInputError> {
        let Some(engine) = self.engine.clone() else {
            return Err(SpeechInputError::UnsupportedEngine);
        };
        if self.is_listening() {
            return Err(SpeechInputError::CaptureInFlight);
        }

        self.state = CaptureState::Listening;
        let outcome = match engine.capture().await {
            Ok(transcript) => {
                debug!(chars = transcript.len(), "capture produced a transcript");
                CaptureOutcome::Transcript(transcript)
            }
            Err(err) => {
                warn!(kind = %err.kind, "speech capture failed");
                CaptureOutcome::Failed(err.kind)
            }
        };
        self.state = CaptureState::Idle;
        Ok(outcome)
    }

    /// Force the adapter back to idle, discarding any in-flight capture.
    ///
    /// Valid only while `Listening`; a no-op otherwise.
    pub fn stop(&mut self) {
        if !self.is_listening() {
            return;
        }
        if let Some(engine) = &self.engine {
            engine.cancel();
        }
        self.state = CaptureState::Idle;
    }
}
