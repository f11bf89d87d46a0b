#![forbid(unsafe_code)]

//! Client for the interview-coach backend.
//!
//! Exposes the three remote operations the session core needs (initial
//! question, next question, answer scoring) behind the [`QuestionBackend`]
//! trait, plus the `reqwest` implementation speaking the backend's JSON
//! wire shapes.

pub mod backend;
pub mod error;
pub mod http;

pub use backend::{QuestionBackend, QuestionEndpoint};
pub use error::GatewayError;
pub use http::{BackendConfig, HttpBackend};
