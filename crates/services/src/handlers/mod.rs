//! The quiz skill's request handlers.

mod basic;
mod error;
mod quiz;

pub use basic::{
    CancelAndStopIntentHandler, FallbackIntentHandler, HelloWorldIntentHandler, HelpIntentHandler,
    IntentReflectorHandler, LaunchRequestHandler, SessionEndedRequestHandler,
};
pub use error::GenericErrorHandler;
pub use quiz::{ANSWER_SLOT, AnswerIntentHandler, StartGameIntentHandler, load_quiz, save_quiz};

/// Intent names the handlers route on.
pub mod intents {
    pub const START_GAME: &str = "StartGameIntent";
    pub const ANSWER: &str = "AnswerIntent";
    pub const HELLO_WORLD: &str = "HelloWorldIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
}
