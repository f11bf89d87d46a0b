use serde::{Deserialize, Serialize};
use std::fmt;

/// Label that conventionally precedes the numeric score inside feedback text.
const SCORE_LABEL: &str = "overall score:";

/// Opaque feedback text returned by the backend for a submitted answer.
///
/// By convention the text embeds a labeled score (`Overall Score: <0-10>`)
/// that the presentation layer may recover via [`Feedback::overall_score`];
/// the session core stores and forwards the text verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback(String);

impl Feedback {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the labeled integer score embedded in the feedback text.
    ///
    /// Matches the first occurrence of `Overall Score:` case-insensitively
    /// and parses the digits that follow. Returns `None` when the label is
    /// absent or not followed by a number.
    #[must_use]
    pub fn overall_score(&self) -> Option<u8> {
        let lowered = self.0.to_lowercase();
        let start = lowered.find(SCORE_LABEL)? + SCORE_LABEL.len();
        let rest = self.0.get(start..)?.trim_start();
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }
}

impl fmt::Debug for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feedback({:?})", self.0)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labeled_score() {
        let feedback = Feedback::new("Overall Score: 7\nGood explanation.");
        assert_eq!(feedback.overall_score(), Some(7));
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let feedback = Feedback::new("overall score:  9 - well done");
        assert_eq!(feedback.overall_score(), Some(9));
    }

    #[test]
    fn missing_label_yields_none() {
        let feedback = Feedback::new("Solid answer, no score given.");
        assert_eq!(feedback.overall_score(), None);
    }

    #[test]
    fn label_without_number_yields_none() {
        let feedback = Feedback::new("Overall Score: pending review");
        assert_eq!(feedback.overall_score(), None);
    }

    #[test]
    fn first_label_occurrence_wins() {
        let feedback = Feedback::new("Overall Score: 4. Previously Overall Score: 8.");
        assert_eq!(feedback.overall_score(), Some(4));
    }
}
