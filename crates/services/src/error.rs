//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::AttributeError;
use quiz_core::quiz::{QuizError, QuizState};
use storage::StorageError;

/// Errors a request handler or interceptor can fail with.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandlerError {
    #[error("required slot `{0}` is missing")]
    MissingSlot(&'static str),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Core(#[from] quiz_core::Error),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Errors routed to the skill's error handler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SkillError {
    #[error("no handler matched request type {request_type}")]
    NoHandlerMatched { request_type: String },
    #[error("handler {handler} failed: {source}")]
    HandlerExecution {
        handler: &'static str,
        #[source]
        source: HandlerError,
    },
    #[error("request interceptor {interceptor} failed: {source}")]
    Interceptor {
        interceptor: &'static str,
        #[source]
        source: HandlerError,
    },
}

impl SkillError {
    /// True when an answer arrived while no question was pending.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        self.quiz_state().is_some()
    }

    /// Quiz state reported by an invalid-state failure, if that is what this is.
    #[must_use]
    pub fn quiz_state(&self) -> Option<QuizState> {
        match self {
            Self::HandlerExecution {
                source: HandlerError::Quiz(QuizError::InvalidState { state }),
                ..
            } => Some(*state),
            _ => None,
        }
    }
}

/// Errors emitted by `SkillRuntime` around dispatch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("malformed request envelope: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("response envelope could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
