//! First-match request routing with interceptor chains around it.
//!
//! A [`Skill`] owns an ordered list of request handlers, one error handler and
//! two interceptor chains. For each request it runs the request interceptors,
//! asks the handlers in registration order whether they can handle it, runs
//! the first one that says yes, and finally shows the response to the response
//! interceptors. Every failure ends up in the error handler, so dispatch
//! always yields a response.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::SessionAttributes;

use crate::directives::{DirectiveBuilder, DocumentId};
use crate::error::{HandlerError, SkillError};
use crate::handlers::GenericErrorHandler;
use crate::i18n::{Localizer, MessageKey, Translator};
use crate::request::SkillRequest;
use crate::response::Response;

//
// ─── HANDLER INPUT ─────────────────────────────────────────────────────────────
//

/// Everything a handler sees for one request.
pub struct HandlerInput<'a> {
    request: &'a SkillRequest,
    session: &'a mut SessionAttributes,
    clock: Clock,
    translator: Translator,
    directive_builder: Option<Arc<dyn DirectiveBuilder>>,
}

impl<'a> HandlerInput<'a> {
    #[must_use]
    pub fn new(request: &'a SkillRequest, session: &'a mut SessionAttributes, clock: Clock) -> Self {
        Self {
            request,
            session,
            clock,
            translator: Translator::fallback(),
            directive_builder: None,
        }
    }

    #[must_use]
    pub fn request(&self) -> &'a SkillRequest {
        self.request
    }

    #[must_use]
    pub fn session(&self) -> &SessionAttributes {
        self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionAttributes {
        self.session
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Swap the translator used by [`HandlerInput::t`].
    pub fn bind_translator(&mut self, translator: Translator) {
        self.translator = translator;
    }

    /// Localized text for `key`.
    #[must_use]
    pub fn t(&self, key: MessageKey, args: &[&str]) -> String {
        self.translator.t(key, args)
    }

    pub(crate) fn set_directive_builder(&mut self, builder: Arc<dyn DirectiveBuilder>) {
        self.directive_builder = Some(builder);
    }

    /// Directive for `document`, or `None` when the device can not show it.
    #[must_use]
    pub fn directive(&self, document: DocumentId, data_source: Value) -> Option<Value> {
        self.directive_builder
            .as_ref()
            .map(|builder| builder.build(document, data_source))
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// A routable unit of skill behaviour.
pub trait RequestHandler: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Side-effect-free check whether this handler owns the request.
    fn can_handle(&self, input: &HandlerInput<'_>) -> bool;

    /// Produce the response.
    ///
    /// # Errors
    ///
    /// Any `HandlerError` is routed to the skill's error handler.
    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError>;
}

/// Last line of defence: turns any failure into a spoken response.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, input: &mut HandlerInput<'_>, error: &SkillError) -> Response;
}

/// Runs before handler selection, e.g. to bind localization or to log.
pub trait RequestInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// A failure aborts dispatch and is routed to the error handler.
    fn process(&self, input: &mut HandlerInput<'_>) -> Result<(), HandlerError>;
}

/// Observes the produced response; failures are logged and ignored.
pub trait ResponseInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Failures are reported with `warn` and do not change the response.
    fn process(&self, input: &HandlerInput<'_>, response: &Response) -> Result<(), HandlerError>;
}

//
// ─── SKILL ─────────────────────────────────────────────────────────────────────
//

/// An assembled dispatcher.
pub struct Skill {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Box<dyn ErrorHandler>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    directive_builder: Option<Arc<dyn DirectiveBuilder>>,
}

impl Skill {
    #[must_use]
    pub fn builder() -> SkillBuilder {
        SkillBuilder::default()
    }

    /// Handler names in routing order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Route one request to exactly one handler and return its response.
    ///
    /// Never fails: handler errors, interceptor errors and unmatched requests
    /// all go to the error handler.
    pub fn dispatch(&self, input: &mut HandlerInput<'_>) -> Response {
        if let Some(builder) = &self.directive_builder {
            if input.request().supports_apl() {
                input.set_directive_builder(Arc::clone(builder));
            }
        }

        let response = match self.route(input) {
            Ok(response) => response,
            Err(error) => self.error_handler.handle(input, &error),
        };

        for interceptor in &self.response_interceptors {
            if let Err(error) = interceptor.process(input, &response) {
                tracing::warn!(
                    interceptor = interceptor.name(),
                    error = %error,
                    "response interceptor failed"
                );
            }
        }

        response
    }

    fn route(&self, input: &mut HandlerInput<'_>) -> Result<Response, SkillError> {
        for interceptor in &self.request_interceptors {
            interceptor
                .process(input)
                .map_err(|source| SkillError::Interceptor {
                    interceptor: interceptor.name(),
                    source,
                })?;
        }

        let handler = {
            let view: &HandlerInput<'_> = input;
            self.handlers.iter().find(|handler| handler.can_handle(view))
        };
        let Some(handler) = handler else {
            return Err(SkillError::NoHandlerMatched {
                request_type: input.request().request_type().to_owned(),
            });
        };

        tracing::debug!(handler = handler.name(), "handler selected");
        handler
            .handle(input)
            .map_err(|source| SkillError::HandlerExecution {
                handler: handler.name(),
                source,
            })
    }
}

/// Collects handlers and interceptors in registration order.
#[derive(Default)]
pub struct SkillBuilder {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Option<Box<dyn ErrorHandler>>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    directive_builder: Option<Arc<dyn DirectiveBuilder>>,
}

impl SkillBuilder {
    #[must_use]
    pub fn add_request_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use]
    pub fn add_request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    #[must_use]
    pub fn add_response_interceptor(
        mut self,
        interceptor: impl ResponseInterceptor + 'static,
    ) -> Self {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_directive_builder(mut self, builder: impl DirectiveBuilder + 'static) -> Self {
        self.directive_builder = Some(Arc::new(builder));
        self
    }

    /// Finish the skill. Without an explicit error handler the generic
    /// apology handler is used.
    #[must_use]
    pub fn build(self) -> Skill {
        Skill {
            handlers: self.handlers,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Box::new(GenericErrorHandler)),
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            directive_builder: self.directive_builder,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
