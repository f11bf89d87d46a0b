use async_trait::async_trait;

use coach_core::model::{Feedback, Question, Role, SessionId};

use crate::error::GatewayError;

/// Which backend question operation to invoke.
///
/// The request and response shapes are identical for both; the endpoint is
/// the only discriminator and the backend decides what "next" means for the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionEndpoint {
    /// First question of a role (also used after a role switch).
    Initial,
    /// Explicit "next question" for the same role and session.
    Next,
}

impl QuestionEndpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            QuestionEndpoint::Initial => "/get_question",
            QuestionEndpoint::Next => "/next_question",
        }
    }
}

/// Outbound operations against the interview-coach backend.
///
/// Implementations perform a single request/response exchange per call and
/// have no side effects beyond the network. The controller, not the backend
/// client, enforces role consistency across calls.
#[async_trait]
pub trait QuestionBackend: Send + Sync {
    /// Fetch a question for the given role and session.
    ///
    /// Resolves to `Ok(None)` when the backend has no question to offer,
    /// which is a legitimate empty state rather than a failure.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` when the exchange fails or the response cannot
    /// be decoded.
    async fn request_question(
        &self,
        endpoint: QuestionEndpoint,
        role: &Role,
        session: &SessionId,
    ) -> Result<Option<Question>, GatewayError>;

    /// Submit an answer for scoring and return the feedback text.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` when the exchange fails or the response cannot
    /// be decoded.
    async fn submit_answer(&self, role: &Role, answer: &str) -> Result<Feedback, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_their_paths() {
        assert_eq!(QuestionEndpoint::Initial.path(), "/get_question");
        assert_eq!(QuestionEndpoint::Next.path(), "/next_question");
    }
}
