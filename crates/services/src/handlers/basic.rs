//! Conversation handlers that do not touch the quiz.

use quiz_core::quiz::QuizSession;

use crate::directives::{DocumentId, screen_data};
use crate::dispatch::{HandlerInput, RequestHandler};
use crate::error::HandlerError;
use crate::handlers::intents;
use crate::i18n::MessageKey;
use crate::request::RequestKind;
use crate::response::{Response, ResponseBuilder};

/// Speak `key`, show it on `document` and wait for the user.
fn prompt(input: &HandlerInput<'_>, key: MessageKey, document: DocumentId) -> Response {
    let text = input.t(key, &[]);
    ResponseBuilder::new()
        .speak(text.clone())
        .reprompt(text.clone())
        .add_optional_directive(input.directive(document, screen_data(&text)))
        .build()
}

pub struct LaunchRequestHandler;

impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "LaunchRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request().kind(), RequestKind::Launch)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        Ok(prompt(input, MessageKey::Welcome, DocumentId::Welcome))
    }
}

pub struct HelloWorldIntentHandler;

impl RequestHandler for HelloWorldIntentHandler {
    fn name(&self) -> &'static str {
        "HelloWorldIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().is_intent(intents::HELLO_WORLD)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let text = input.t(MessageKey::Hello, &[]);
        Ok(ResponseBuilder::new()
            .speak(text.clone())
            .add_optional_directive(input.directive(DocumentId::Hello, screen_data(&text)))
            .build())
    }
}

pub struct HelpIntentHandler;

impl RequestHandler for HelpIntentHandler {
    fn name(&self) -> &'static str {
        "HelpIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().is_intent(intents::HELP)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        Ok(prompt(input, MessageKey::Help, DocumentId::Help))
    }
}

pub struct CancelAndStopIntentHandler;

impl RequestHandler for CancelAndStopIntentHandler {
    fn name(&self) -> &'static str {
        "CancelAndStopIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        let request = input.request();
        request.is_intent(intents::CANCEL) || request.is_intent(intents::STOP)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let text = input.t(MessageKey::Goodbye, &[]);
        Ok(ResponseBuilder::new()
            .speak(text.clone())
            .add_optional_directive(input.directive(DocumentId::Finish, screen_data(&text)))
            .with_should_end_session(true)
            .build())
    }
}

/// Catches utterances the interaction model could not map to an intent.
pub struct FallbackIntentHandler;

impl RequestHandler for FallbackIntentHandler {
    fn name(&self) -> &'static str {
        "FallbackIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().is_intent(intents::FALLBACK)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let text = input.t(MessageKey::Fallback, &[]);
        Ok(ResponseBuilder::new().speak(text.clone()).reprompt(text).build())
    }
}

/// Cleans up when the platform closes the session. Nothing is spoken.
pub struct SessionEndedRequestHandler;

impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "SessionEndedRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request().kind(), RequestKind::SessionEnded { .. })
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        if let RequestKind::SessionEnded { reason } = input.request().kind() {
            tracing::info!(
                session_id = %input.request().session_id(),
                reason = reason.as_deref().unwrap_or("unknown"),
                "session ended"
            );
        }
        input.session_mut().remove(QuizSession::ATTRIBUTE_KEY);
        Ok(Response::empty())
    }
}

/// Echoes the name of any intent nothing else claimed. Register it last.
pub struct IntentReflectorHandler;

impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &'static str {
        "IntentReflectorHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().as_intent().is_some()
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let name = input.request().intent_name().unwrap_or_default();
        Ok(ResponseBuilder::new()
            .speak(input.t(MessageKey::Reflector, &[name]))
            .build())
    }
}
