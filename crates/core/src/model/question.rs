use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("answer option {0} cannot be empty")]
    EmptyOption(usize),

    #[error("correct answer index {0} is out of range")]
    CorrectIndexOutOfRange(usize),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice trivia question with four options.
///
/// Immutable once built. `correct_answer_index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer_index: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, or if
    /// `correct_answer_index` does not point at one of the options.
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer_index: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if let Some(pos) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(pos));
        }
        if correct_answer_index >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange(correct_answer_index));
        }

        Ok(Self {
            text,
            options,
            correct_answer_index,
        })
    }

    /// Re-check invariants of a question that came back from session storage.
    pub(crate) fn validate(&self) -> Result<(), QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if let Some(pos) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(pos));
        }
        if self.correct_answer_index >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange(
                self.correct_answer_index,
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> usize {
        self.correct_answer_index
    }

    /// The 1-based option number a user would say for the correct answer.
    #[must_use]
    pub fn correct_option_number(&self) -> usize {
        self.correct_answer_index + 1
    }

    /// Options prefixed with their spoken numbers, e.g. `1) 1939`.
    #[must_use]
    pub fn numbered_options(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}) {option}", i + 1))
            .collect()
    }
}
