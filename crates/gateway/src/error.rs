//! Shared error types for the gateway crate.

use thiserror::Error;

/// Errors emitted by [`crate::QuestionBackend`] implementations.
///
/// Both variants describe a failed exchange; a backend that answers
/// successfully but has no question to offer is not an error (the question
/// operations return `Ok(None)` for that).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
