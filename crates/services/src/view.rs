use coach_core::model::Feedback;

use crate::flow::FlowStatus;

/// Snapshot of controller state for presentation collaborators.
///
/// Plain data: the role selector gets `role`, the feedback card gets
/// `feedback`, the question display gets the rest. The `can_*` flags mirror
/// the affordance gating the controller enforces, so the presentation layer
/// only has to disable what the snapshot says is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowView {
    pub role: String,
    pub session_id: String,
    pub status: FlowStatus,
    pub question: Option<String>,
    pub draft: String,
    pub feedback: Option<Feedback>,
    pub error: Option<String>,
    pub loading: bool,
    pub listening: bool,
    pub can_submit: bool,
    pub can_next: bool,
    pub can_previous: bool,
    pub can_try_again: bool,
    pub can_play: bool,
    pub can_capture: bool,
}

impl FlowView {
    /// Feedback text to render, empty string meaning "nothing to show".
    #[must_use]
    pub fn feedback_text(&self) -> &str {
        self.feedback.as_ref().map_or("", Feedback::as_str)
    }
}
