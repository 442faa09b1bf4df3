use crate::dispatch::{ErrorHandler, HandlerInput};
use crate::error::SkillError;
use crate::i18n::MessageKey;
use crate::response::{Response, ResponseBuilder};

/// Logs the failure and apologizes, keeping the session open.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericErrorHandler;

impl ErrorHandler for GenericErrorHandler {
    fn handle(&self, input: &mut HandlerInput<'_>, error: &SkillError) -> Response {
        let request = input.request();
        tracing::error!(
            request_id = %request.id(),
            session_id = %request.session_id(),
            request_type = request.request_type(),
            quiz_state = ?error.quiz_state(),
            error = %error,
            "request failed"
        );
        let text = input.t(MessageKey::Error, &[]);
        ResponseBuilder::new().speak(text.clone()).reprompt(text).build()
    }
}
