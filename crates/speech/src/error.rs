//! Shared error types for the speech crate.

use std::fmt;

use thiserror::Error;

/// Reasons a capture attempt can fail mid-flight.
///
/// Mirrors the error set a browser speech engine reports. Capture failures
/// are non-fatal to the session: the adapter logs the kind and returns to
/// idle without a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CaptureErrorKind {
    /// No speech was detected before the engine gave up.
    NoSpeech,
    /// The capture was aborted before a final result was produced.
    Aborted,
    /// No usable audio input device.
    AudioUnavailable,
    /// Microphone permission denied by the host.
    NotAllowed,
    /// The engine needed a network service it could not reach.
    Network,
    /// Engine-specific failure.
    Other(String),
}

impl fmt::Display for CaptureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureErrorKind::NoSpeech => write!(f, "no-speech"),
            CaptureErrorKind::Aborted => write!(f, "aborted"),
            CaptureErrorKind::AudioUnavailable => write!(f, "audio-unavailable"),
            CaptureErrorKind::NotAllowed => write!(f, "not-allowed"),
            CaptureErrorKind::Network => write!(f, "network"),
            CaptureErrorKind::Other(detail) => write!(f, "other: {detail}"),
        }
    }
}

/// A failed capture attempt reported by a [`crate::RecognitionEngine`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("speech capture failed: {kind}")]
pub struct CaptureError {
    pub kind: CaptureErrorKind,
}

impl CaptureError {
    #[must_use]
    pub fn new(kind: CaptureErrorKind) -> Self {
        Self { kind }
    }
}

/// Errors emitted by [`crate::SpeechInput`].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechInputError {
    /// The host offers no voice-to-text engine. Reported on the attempt to
    /// use it; typed input is unaffected.
    #[error("no speech recognition engine is available")]
    UnsupportedEngine,
    /// A capture is already in flight; callers disable the trigger instead
    /// of queuing a second one.
    #[error("a capture is already in progress")]
    CaptureInFlight,
}

/// Errors emitted by [`crate::SynthesisEngine`] implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthesisError {
    #[error("synthesis engine failed to start: {0}")]
    Spawn(#[from] std::io::Error),
}
