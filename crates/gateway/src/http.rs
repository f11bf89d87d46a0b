use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use coach_core::model::{Feedback, Question, Role, SessionId};

use crate::backend::{QuestionBackend, QuestionEndpoint};
use crate::error::GatewayError;

const ASK_PATH: &str = "/ask";

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    /// Reads the backend location from `COACH_BACKEND_URL`, falling back to
    /// the local development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("COACH_BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        Self { base_url }
    }
}

/// `reqwest`-backed implementation of [`QuestionBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp, GatewayError>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        debug!(path, "posting to backend");
        let response = self.client.post(self.url(path)).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuestionBackend for HttpBackend {
    async fn request_question(
        &self,
        endpoint: QuestionEndpoint,
        role: &Role,
        session: &SessionId,
    ) -> Result<Option<Question>, GatewayError> {
        let payload = QuestionRequest {
            role: role.as_str(),
            session_id: session.to_string(),
        };
        let body: QuestionResponse = self.post_json(endpoint.path(), &payload).await?;
        Ok(body.into_question())
    }

    async fn submit_answer(&self, role: &Role, answer: &str) -> Result<Feedback, GatewayError> {
        let payload = AskRequest {
            role: role.as_str(),
            answer,
        };
        let body: AskResponse = self.post_json(ASK_PATH, &payload).await?;
        Ok(Feedback::new(body.feedback))
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct QuestionRequest<'a> {
    role: &'a str,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    #[serde(default)]
    question: Option<String>,
}

impl QuestionResponse {
    /// An absent, null, or blank question field means "no question available".
    fn into_question(self) -> Option<Question> {
        self.question
            .filter(|text| !text.trim().is_empty())
            .map(Question::new)
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    role: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_request_carries_role_and_session() {
        let session: SessionId = "6f9619ff-8b86-4d01-b42d-00cf4fc964ff".parse().unwrap();
        let payload = QuestionRequest {
            role: "DSA",
            session_id: session.to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["role"], "DSA");
        assert_eq!(json["session_id"], "6f9619ff-8b86-4d01-b42d-00cf4fc964ff");
    }

    #[test]
    fn present_question_is_decoded() {
        let body: QuestionResponse =
            serde_json::from_str(r#"{"question":"Explain binary search."}"#).unwrap();
        assert_eq!(
            body.into_question().unwrap().as_str(),
            "Explain binary search."
        );
    }

    #[test]
    fn absent_question_field_means_empty() {
        let body: QuestionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_question(), None);
    }

    #[test]
    fn blank_question_means_empty() {
        let body: QuestionResponse = serde_json::from_str(r#"{"question":"   "}"#).unwrap();
        assert_eq!(body.into_question(), None);

        let body: QuestionResponse = serde_json::from_str(r#"{"question":null}"#).unwrap();
        assert_eq!(body.into_question(), None);
    }

    #[test]
    fn ask_response_decodes_feedback_verbatim() {
        let body: AskResponse =
            serde_json::from_str(r#"{"feedback":"Overall Score: 7\nGood explanation."}"#).unwrap();
        assert_eq!(body.feedback, "Overall Score: 7\nGood explanation.");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new(BackendConfig {
            base_url: "http://localhost:8000/".into(),
        });
        assert_eq!(backend.url("/ask"), "http://localhost:8000/ask");
    }
}
