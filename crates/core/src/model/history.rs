use chrono::{DateTime, Utc};

use crate::model::Question;

/// A question together with the time it was recorded.
///
/// Ordinal position is the entry's index in the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    question: Question,
    recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Append-biased log of fetched questions with a movable cursor.
///
/// Follows browser-history semantics: recording a new question while the
/// cursor sits mid-log discards every entry after the cursor before
/// appending. Moving the cursor never creates or deletes entries; there is
/// no redo-forward operation, forward movement beyond the tail only happens
/// through [`QuestionHistory::record`].
#[derive(Debug, Clone, Default)]
pub struct QuestionHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl QuestionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly fetched question.
    ///
    /// Truncates all entries strictly after the cursor, appends the question,
    /// and advances the cursor to the new tail. Returns the new cursor index.
    pub fn record(&mut self, question: Question, recorded_at: DateTime<Utc>) -> usize {
        let keep = self.cursor.map_or(0, |index| index + 1);
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            question,
            recorded_at,
        });
        let index = self.entries.len() - 1;
        self.cursor = Some(index);
        index
    }

    /// The question at the cursor, or `None` when no question was fetched yet.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current_entry().map(HistoryEntry::question)
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|index| index > 0)
    }

    /// Moves the cursor one entry back.
    ///
    /// No-op returning `false` unless [`QuestionHistory::can_go_back`] holds;
    /// callers are expected to check the precondition first.
    pub fn go_back(&mut self) -> bool {
        match self.cursor {
            Some(index) if index > 0 => {
                self.cursor = Some(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Returns a copy of the question at the cursor without moving it.
    ///
    /// Supports "try again": re-show the same question without consuming a
    /// fetch. Never mutates entry count or cursor.
    #[must_use]
    pub fn replay(&self) -> Option<Question> {
        self.current().cloned()
    }

    /// Drops all entries and resets the cursor, as on a role switch.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
