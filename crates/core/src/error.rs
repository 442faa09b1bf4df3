use thiserror::Error;

use crate::model::{AttributeError, LocaleError, QuestionError};
use crate::quiz::QuizError;

/// Umbrella error for callers that do not care which part of the core failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
