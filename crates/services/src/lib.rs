#![forbid(unsafe_code)]

pub mod config;
pub mod directives;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod interceptors;
pub mod request;
pub mod response;
pub mod runtime;
pub mod skill;

pub use config::SkillConfig;
pub use dispatch::{
    ErrorHandler, HandlerInput, RequestHandler, RequestInterceptor, ResponseInterceptor, Skill,
    SkillBuilder,
};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use error::{HandlerError, RuntimeError, SkillError};
pub use request::{Intent, RequestKind, SkillRequest};
pub use response::{Response, ResponseBuilder};
pub use runtime::SkillRuntime;
pub use skill::build_quiz_skill;
