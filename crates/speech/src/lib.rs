#![forbid(unsafe_code)]

//! Speech adapters for the interview-coach session core.
//!
//! Two narrow wrappers over host-provided speech capabilities: voice-to-text
//! capture behind [`SpeechInput`] and text-to-speech playback behind
//! [`SpeechOutput`]. Engines plug in through the [`RecognitionEngine`] and
//! [`SynthesisEngine`] seams; a host without an engine still gets a working
//! (degraded) adapter.

pub mod error;
pub mod espeak;
pub mod input;
pub mod output;

pub use error::{CaptureError, CaptureErrorKind, SpeechInputError, SynthesisError};
pub use espeak::EspeakSynthesis;
pub use input::{CaptureOutcome, CaptureState, RecognitionEngine, SpeechInput};
pub use output::{SpeechOutput, SynthesisEngine};
