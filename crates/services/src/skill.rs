use std::sync::Arc;

use quiz_core::QuestionBank;

use crate::config::SkillConfig;
use crate::directives::AplDirectiveBuilder;
use crate::dispatch::Skill;
use crate::handlers::{
    AnswerIntentHandler, CancelAndStopIntentHandler, FallbackIntentHandler, GenericErrorHandler,
    HelloWorldIntentHandler, HelpIntentHandler, IntentReflectorHandler, LaunchRequestHandler,
    SessionEndedRequestHandler, StartGameIntentHandler,
};
use crate::i18n::MessageCatalog;
use crate::interceptors::{
    LocalizationInterceptor, RequestLoggingInterceptor, ResponseLoggingInterceptor,
};

/// Assemble the quiz skill.
///
/// Handler order matters: the reflector catches every intent, so it goes last.
#[must_use]
pub fn build_quiz_skill(config: &SkillConfig, questions: Arc<dyn QuestionBank>) -> Skill {
    let builder = Skill::builder()
        .add_request_handler(LaunchRequestHandler)
        .add_request_handler(StartGameIntentHandler::new(questions))
        .add_request_handler(AnswerIntentHandler)
        .add_request_handler(HelloWorldIntentHandler)
        .add_request_handler(HelpIntentHandler)
        .add_request_handler(CancelAndStopIntentHandler)
        .add_request_handler(FallbackIntentHandler)
        .add_request_handler(SessionEndedRequestHandler)
        .add_request_handler(IntentReflectorHandler)
        .with_error_handler(GenericErrorHandler)
        .add_request_interceptor(LocalizationInterceptor::new(MessageCatalog::shared_builtin()))
        .add_request_interceptor(RequestLoggingInterceptor)
        .add_response_interceptor(ResponseLoggingInterceptor);

    if config.directives_enabled {
        builder
            .with_directive_builder(AplDirectiveBuilder::new(config.directive_token.clone()))
            .build()
    } else {
        builder.build()
    }
}
