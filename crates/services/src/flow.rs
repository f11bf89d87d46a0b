use std::sync::Arc;

use tracing::{debug, warn};

use coach_core::model::{Feedback, Question, QuestionHistory, Role, SessionId};
use coach_core::Clock;
use gateway::{GatewayError, QuestionBackend, QuestionEndpoint};
use speech::{CaptureOutcome, SpeechInput, SpeechInputError, SpeechOutput};

use crate::view::FlowView;

/// User-facing message when a question fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch question. Please check your connection.";
/// User-facing message for the empty state (backend had no question).
pub const NO_QUESTION_MESSAGE: &str = "No question available. Please try again later.";
/// Feedback fallback when answer submission fails.
pub const SUBMIT_FALLBACK_FEEDBACK: &str = "An error occurred. Please try again.";
/// One-shot notice when the host has no speech recognition engine.
pub const SPEECH_UNSUPPORTED_NOTICE: &str =
    "Speech recognition is not supported on this system.";

/// Settled view of the controller's state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    /// A fetch or submit is in flight; user actions are disabled.
    Loading,
    /// A question is displayed and answerable.
    Ready,
    /// The backend had no question to offer.
    Empty,
    /// A fetch failed; holds the user-facing message.
    Error(String),
}

/// Ticket pairing an in-flight question fetch with the state it was issued
/// from. Applying a result with an outdated ticket discards it.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    epoch: u64,
    endpoint: QuestionEndpoint,
}

impl FetchTicket {
    #[must_use]
    pub fn endpoint(&self) -> QuestionEndpoint {
        self.endpoint
    }
}

/// Ticket pairing an in-flight answer submission with its issuing state.
#[derive(Debug, Clone, Copy)]
pub struct SubmitTicket {
    epoch: u64,
}

/// Drives one interview-practice session.
///
/// Owns the current question, answer draft, feedback and loading/error
/// status, and serializes all state mutation: its async operations take
/// `&mut self`, so only one fetch or submit is in flight at a time from the
/// controller's point of view. Responses that arrive after the user has
/// navigated away (tracked by an epoch counter) are detected and discarded
/// instead of clobbering newer state.
pub struct SessionFlow {
    backend: Arc<dyn QuestionBackend>,
    speech_in: SpeechInput,
    speech_out: SpeechOutput,
    session: SessionId,
    role: Role,
    history: QuestionHistory,
    question: Option<Question>,
    draft: String,
    feedback: Option<Feedback>,
    error: Option<String>,
    loading: bool,
    notice: Option<String>,
    speech_notice_shown: bool,
    epoch: u64,
    clock: Clock,
}

impl SessionFlow {
    /// Creates a controller for a fresh session.
    ///
    /// The session token is generated here and lives as long as the
    /// controller; call [`SessionFlow::start`] to fetch the first question.
    #[must_use]
    pub fn new(
        backend: Arc<dyn QuestionBackend>,
        speech_in: SpeechInput,
        speech_out: SpeechOutput,
        role: Role,
    ) -> Self {
        Self {
            backend,
            speech_in,
            speech_out,
            session: SessionId::generate(),
            role,
            history: QuestionHistory::new(),
            question: None,
            draft: String::new(),
            feedback: None,
            error: None,
            loading: false,
            notice: None,
            speech_notice_shown: false,
            epoch: 0,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    //
    // ─── QUESTION FETCHING ─────────────────────────────────────────────────────
    //

    /// Fetch the first question for the active role.
    pub async fn start(&mut self) {
        let ticket = self.begin_fetch(QuestionEndpoint::Initial);
        let result = self.request(ticket.endpoint).await;
        self.apply_fetch(ticket, result);
    }

    /// Fetch a new question and append it to the history.
    ///
    /// No-op while another fetch or submit is in flight.
    pub async fn next_question(&mut self) {
        if self.loading {
            return;
        }
        let ticket = self.begin_fetch(QuestionEndpoint::Next);
        let result = self.request(ticket.endpoint).await;
        self.apply_fetch(ticket, result);
    }

    /// Switch to a different role and restart the question flow.
    ///
    /// A role switch starts a brand-new session strand: history is discarded
    /// entirely and the first question of the new role is fetched. No-op when
    /// the role is unchanged.
    pub async fn select_role(&mut self, role: Role) {
        let Some(ticket) = self.change_role(role) else {
            return;
        };
        let result = self.request(ticket.endpoint).await;
        self.apply_fetch(ticket, result);
    }

    /// Adopt a new role and open the fetch for its first question, without
    /// running the request. Returns `None` when the role is unchanged.
    ///
    /// Split from [`SessionFlow::select_role`] so callers that drive the
    /// request themselves can interleave a role change with an in-flight
    /// fetch; the epoch bump invalidates the older ticket.
    pub fn change_role(&mut self, role: Role) -> Option<FetchTicket> {
        if role == self.role {
            return None;
        }
        self.role = role;
        self.history.clear();
        self.question = None;
        self.draft.clear();
        self.feedback = None;
        Some(self.begin_fetch(QuestionEndpoint::Initial))
    }

    /// Mark a question fetch as in flight and hand out its ticket.
    pub fn begin_fetch(&mut self, endpoint: QuestionEndpoint) -> FetchTicket {
        self.epoch += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            epoch: self.epoch,
            endpoint,
        }
    }

    /// Apply the outcome of a question fetch.
    ///
    /// Discards the result when the ticket is stale, i.e. when the user
    /// changed role or issued a newer operation while this one was in
    /// flight.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Option<Question>, GatewayError>,
    ) {
        if ticket.epoch != self.epoch {
            debug!(endpoint = ?ticket.endpoint, "discarding stale question response");
            return;
        }
        self.loading = false;
        self.draft.clear();
        self.feedback = None;
        match result {
            Ok(Some(question)) => {
                self.history.record(question.clone(), self.clock.now());
                self.question = Some(question);
                self.error = None;
            }
            Ok(None) => {
                self.question = None;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "question fetch failed");
                self.question = None;
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
    }

    async fn request(
        &self,
        endpoint: QuestionEndpoint,
    ) -> Result<Option<Question>, GatewayError> {
        self.backend
            .request_question(endpoint, &self.role, &self.session)
            .await
    }

    //
    // ─── ANSWER SUBMISSION ─────────────────────────────────────────────────────
    //

    /// Submit the current draft for scoring.
    ///
    /// Rejected without a backend call unless a question is displayed, the
    /// draft is non-blank and nothing else is in flight. The draft survives
    /// submission so the user can review it next to the feedback.
    pub async fn submit_answer(&mut self) {
        let Some(ticket) = self.begin_submit() else {
            return;
        };
        let role = self.role.clone();
        let answer = self.draft.clone();
        let result = self.backend.submit_answer(&role, &answer).await;
        self.apply_submit(ticket, result);
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.loading && self.question.is_some() && !self.draft.trim().is_empty()
    }

    /// Mark an answer submission as in flight, or `None` when submission is
    /// currently rejected.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.can_submit() {
            return None;
        }
        self.epoch += 1;
        self.loading = true;
        Some(SubmitTicket { epoch: self.epoch })
    }

    /// Apply the outcome of an answer submission.
    ///
    /// Stale tickets are discarded; a failed submission degrades to the
    /// fixed fallback feedback text instead of an error state.
    pub fn apply_submit(&mut self, ticket: SubmitTicket, result: Result<Feedback, GatewayError>) {
        if ticket.epoch != self.epoch {
            debug!("discarding stale feedback response");
            return;
        }
        self.loading = false;
        match result {
            Ok(feedback) => self.feedback = Some(feedback),
            Err(err) => {
                warn!(error = %err, "answer submission failed");
                self.feedback = Some(Feedback::new(SUBMIT_FALLBACK_FEEDBACK));
            }
        }
    }

    //
    // ─── HISTORY NAVIGATION ────────────────────────────────────────────────────
    //

    /// Step back to the previously fetched question.
    ///
    /// No-op (state unchanged, no backend call) unless the history cursor
    /// can move back and nothing is in flight.
    pub fn previous_question(&mut self) {
        if self.loading || !self.history.can_go_back() {
            return;
        }
        self.history.go_back();
        self.question = self.history.replay();
        self.draft.clear();
        self.feedback = None;
        self.error = None;
    }

    /// Re-show the current question with a clean slate.
    ///
    /// Clears the draft and feedback without touching the history or the
    /// backend. No-op when there is no recorded question or while loading.
    pub fn try_again(&mut self) {
        if self.loading {
            return;
        }
        let Some(question) = self.history.replay() else {
            return;
        };
        self.question = Some(question);
        self.draft.clear();
        self.feedback = None;
        self.error = None;
    }

    //
    // ─── ANSWER DRAFT & SPEECH ─────────────────────────────────────────────────
    //

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Capture one spoken utterance and append it to the draft.
    ///
    /// No-op while loading, without a question, or while already listening.
    /// A missing engine surfaces the unsupported notice once; capture
    /// failures were already logged by the adapter and change nothing
    /// user-visible beyond the listening indicator.
    pub async fn capture_answer(&mut self) {
        if self.loading || self.question.is_none() || self.speech_in.is_listening() {
            return;
        }
        match self.speech_in.capture().await {
            Ok(CaptureOutcome::Transcript(transcript)) => self.append_transcript(&transcript),
            Ok(CaptureOutcome::Failed(_)) => {}
            Err(SpeechInputError::UnsupportedEngine) => {
                if !self.speech_notice_shown {
                    self.speech_notice_shown = true;
                    self.notice = Some(SPEECH_UNSUPPORTED_NOTICE.to_string());
                }
            }
            Err(_) => {}
        }
    }

    /// Stop an in-flight capture, discarding any partial result.
    pub fn stop_capture(&mut self) {
        self.speech_in.stop();
    }

    /// Speak the current question aloud, cancelling any prior utterance.
    pub fn play_question(&self) {
        if let Some(question) = &self.question {
            self.speech_out.speak(question.as_str());
        }
    }

    /// Takes the pending one-shot notice, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn append_transcript(&mut self, transcript: &str) {
        if transcript.is_empty() {
            return;
        }
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(transcript);
    }

    //
    // ─── STATE ACCESSORS ───────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn status(&self) -> FlowStatus {
        if self.loading {
            FlowStatus::Loading
        } else if let Some(message) = &self.error {
            FlowStatus::Error(message.clone())
        } else if self.question.is_some() {
            FlowStatus::Ready
        } else {
            FlowStatus::Empty
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.speech_in.is_listening()
    }

    #[must_use]
    pub fn history(&self) -> &QuestionHistory {
        &self.history
    }

    /// Snapshot of everything the presentation layer renders.
    #[must_use]
    pub fn view(&self) -> FlowView {
        let has_question = self.question.is_some();
        FlowView {
            role: self.role.to_string(),
            session_id: self.session.to_string(),
            status: self.status(),
            question: self.question.as_ref().map(|q| q.as_str().to_string()),
            draft: self.draft.clone(),
            feedback: self.feedback.clone(),
            error: self.error.clone(),
            loading: self.loading,
            listening: self.is_listening(),
            can_submit: self.can_submit(),
            can_next: !self.loading,
            can_previous: !self.loading && self.history.can_go_back(),
            can_try_again: !self.loading && !self.history.is_empty(),
            can_play: !self.loading && has_question,
            can_capture: !self.loading && has_question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use speech::{CaptureError, CaptureErrorKind, RecognitionEngine};

    struct ScriptedBackend {
        questions: Mutex<Vec<Result<Option<Question>, GatewayError>>>,
        feedback: Mutex<Vec<Result<Feedback, GatewayError>>>,
        question_calls: AtomicUsize,
        ask_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new() -> Self {
            Self {
                questions: Mutex::new(Vec::new()),
                feedback: Mutex::new(Vec::new()),
                question_calls: AtomicUsize::new(0),
                ask_calls: AtomicUsize::new(0),
            }
        }

        fn push_question(&self, text: &str) {
            self.questions
                .lock()
                .unwrap()
                .push(Ok(Some(Question::new(text))));
        }

        fn push_feedback(&self, text: &str) {
            self.feedback.lock().unwrap().push(Ok(Feedback::new(text)));
        }
    }

    #[async_trait]
    impl QuestionBackend for ScriptedBackend {
        async fn request_question(
            &self,
            _endpoint: QuestionEndpoint,
            _role: &Role,
            _session: &SessionId,
        ) -> Result<Option<Question>, GatewayError> {
            self.question_calls.fetch_add(1, Ordering::SeqCst);
            let mut scripted = self.questions.lock().unwrap();
            if scripted.is_empty() {
                Ok(None)
            } else {
                scripted.remove(0)
            }
        }

        async fn submit_answer(
            &self,
            _role: &Role,
            _answer: &str,
        ) -> Result<Feedback, GatewayError> {
            self.ask_calls.fetch_add(1, Ordering::SeqCst);
            let mut scripted = self.feedback.lock().unwrap();
            if scripted.is_empty() {
                Ok(Feedback::new("ok"))
            } else {
                scripted.remove(0)
            }
        }
    }

    struct FixedTranscript(&'static str);

    #[async_trait]
    impl RecognitionEngine for FixedTranscript {
        async fn capture(&self) -> Result<String, CaptureError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl RecognitionEngine for FailingEngine {
        async fn capture(&self) -> Result<String, CaptureError> {
            Err(CaptureError::new(CaptureErrorKind::NoSpeech))
        }
    }

    fn flow_with(backend: Arc<ScriptedBackend>, speech_in: SpeechInput) -> SessionFlow {
        SessionFlow::new(
            backend,
            speech_in,
            SpeechOutput::disabled(),
            Role::default(),
        )
        .with_clock(coach_core::time::fixed_clock())
    }

    #[tokio::test]
    async fn blank_draft_is_rejected_without_a_backend_call() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        let mut flow = flow_with(backend.clone(), SpeechInput::unsupported());
        flow.start().await;

        flow.set_draft("   \n\t");
        flow.submit_answer().await;

        assert_eq!(backend.ask_calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.feedback(), None);
        assert_eq!(flow.status(), FlowStatus::Ready);
    }

    #[tokio::test]
    async fn previous_at_the_first_question_is_a_no_op() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        let mut flow = flow_with(backend.clone(), SpeechInput::unsupported());
        flow.start().await;
        flow.set_draft("half-typed answer");

        flow.previous_question();

        assert_eq!(flow.question().unwrap().as_str(), "Explain binary search.");
        assert_eq!(flow.draft(), "half-typed answer");
        assert_eq!(flow.history().cursor(), Some(0));
        assert_eq!(backend.question_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_response_is_discarded_after_a_role_change() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut flow = flow_with(backend, SpeechInput::unsupported());

        // Fetch for the initial role goes out...
        let stale = flow.begin_fetch(QuestionEndpoint::Initial);
        // ...and the user switches role before it resolves.
        let fresh = flow.change_role(Role::new("ML")).unwrap();

        flow.apply_fetch(stale, Ok(Some(Question::new("DSA question"))));
        assert_eq!(flow.status(), FlowStatus::Loading);
        assert!(flow.history().is_empty());

        flow.apply_fetch(fresh, Ok(Some(Question::new("ML question"))));
        assert_eq!(flow.question().unwrap().as_str(), "ML question");
        assert_eq!(flow.history().len(), 1);
        assert_eq!(flow.role().as_str(), "ML");
    }

    #[tokio::test]
    async fn transcript_appends_to_the_draft_with_a_separating_space() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        let engine = Arc::new(FixedTranscript("binary search"));

        let mut flow = flow_with(backend.clone(), SpeechInput::new(engine.clone()));
        flow.start().await;

        flow.capture_answer().await;
        assert_eq!(flow.draft(), "binary search");

        flow.set_draft("Answer:");
        flow.capture_answer().await;
        assert_eq!(flow.draft(), "Answer: binary search");
    }

    #[tokio::test]
    async fn capture_failure_leaves_the_draft_untouched() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        let mut flow = flow_with(backend, SpeechInput::new(Arc::new(FailingEngine)));
        flow.start().await;
        flow.set_draft("typed so far");

        flow.capture_answer().await;

        assert_eq!(flow.draft(), "typed so far");
        assert!(!flow.is_listening());
        assert_eq!(flow.take_notice(), None);
    }

    #[tokio::test]
    async fn unsupported_engine_notice_is_surfaced_exactly_once() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        let mut flow = flow_with(backend, SpeechInput::unsupported());
        flow.start().await;

        flow.capture_answer().await;
        assert_eq!(flow.take_notice().as_deref(), Some(SPEECH_UNSUPPORTED_NOTICE));

        flow.capture_answer().await;
        assert_eq!(flow.take_notice(), None);
    }

    #[tokio::test]
    async fn try_again_clears_draft_and_feedback_only() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_question("Explain binary search.");
        backend.push_feedback("Overall Score: 7\nGood explanation.");
        let mut flow = flow_with(backend.clone(), SpeechInput::unsupported());
        flow.start().await;
        flow.set_draft("an answer");
        flow.submit_answer().await;
        assert!(flow.feedback().is_some());

        flow.try_again();

        assert_eq!(flow.question().unwrap().as_str(), "Explain binary search.");
        assert_eq!(flow.draft(), "");
        assert_eq!(flow.feedback(), None);
        assert_eq!(flow.history().len(), 1);
        assert_eq!(backend.question_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn view_gates_actions_while_empty() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut flow = flow_with(backend, SpeechInput::unsupported());
        flow.start().await;

        let view = flow.view();
        assert_eq!(view.status, FlowStatus::Empty);
        assert!(!view.can_submit);
        assert!(!view.can_previous);
        assert!(!view.can_play);
        assert!(view.can_next);
    }
}
