#![forbid(unsafe_code)]

//! Session flow orchestration for the interview coach.
//!
//! [`SessionFlow`] owns the question history, the answer draft, the feedback
//! text and the loading/error status, and drives the backend gateway and the
//! speech adapters in response to user actions. Presentation collaborators
//! read the current state through [`FlowView`] snapshots; no failure
//! propagates past the controller.

pub mod flow;
pub mod view;

pub use coach_core::Clock;

pub use flow::{
    FetchTicket, FlowStatus, SessionFlow, SubmitTicket, FETCH_FAILED_MESSAGE, NO_QUESTION_MESSAGE,
    SPEECH_UNSUPPORTED_NOTICE, SUBMIT_FALLBACK_FEEDBACK,
};
pub use view::FlowView;
