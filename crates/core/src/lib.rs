#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod question_bank;
pub mod quiz;
pub mod time;

pub use error::Error;
pub use question_bank::{BuiltinQuestionBank, QuestionBank, generate_questions};
pub use time::Clock;
