//! Quiz progression: start, answer checking, scoring.

mod answer;
mod score;
mod session;

#[cfg(test)]
mod proptests;

use thiserror::Error;

pub use answer::AnswerChoice;
pub use score::Score;
pub use session::{AnswerOutcome, AnswerVerdict, QuizSession, QuizState, QuizStep};

/// Errors raised by the quiz state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no question is awaiting an answer (state: {state:?})")]
    InvalidState { state: QuizState },

    #[error("`{0}` is not a valid option number")]
    InvalidAnswer(String),

    #[error("stored quiz state is corrupted: {0}")]
    Corrupted(String),
}
