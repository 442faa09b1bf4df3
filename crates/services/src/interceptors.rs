//! Interceptors registered around every request.

use std::sync::Arc;

use crate::dispatch::{HandlerInput, RequestInterceptor, ResponseInterceptor};
use crate::error::HandlerError;
use crate::i18n::{MessageCatalog, Translator};
use crate::response::Response;

/// Binds a translator for the request locale.
pub struct LocalizationInterceptor {
    catalog: Arc<MessageCatalog>,
}

impl LocalizationInterceptor {
    #[must_use]
    pub fn new(catalog: Arc<MessageCatalog>) -> Self {
        Self { catalog }
    }
}

impl Default for LocalizationInterceptor {
    fn default() -> Self {
        Self::new(MessageCatalog::shared_builtin())
    }
}

impl RequestInterceptor for LocalizationInterceptor {
    fn name(&self) -> &'static str {
        "LocalizationInterceptor"
    }

    fn process(&self, input: &mut HandlerInput<'_>) -> Result<(), HandlerError> {
        let translator = Translator::new(Arc::clone(&self.catalog), input.request().locale());
        input.bind_translator(translator);
        Ok(())
    }
}

pub struct RequestLoggingInterceptor;

impl RequestInterceptor for RequestLoggingInterceptor {
    fn name(&self) -> &'static str {
        "RequestLoggingInterceptor"
    }

    fn process(&self, input: &mut HandlerInput<'_>) -> Result<(), HandlerError> {
        let request = input.request();
        tracing::info!(
            request_id = %request.id(),
            session_id = %request.session_id(),
            request_type = request.request_type(),
            intent = request.intent_name(),
            locale = %request.locale(),
            new_session = request.is_new_session(),
            "request received"
        );
        Ok(())
    }
}

pub struct ResponseLoggingInterceptor;

impl ResponseInterceptor for ResponseLoggingInterceptor {
    fn name(&self) -> &'static str {
        "ResponseLoggingInterceptor"
    }

    fn process(&self, input: &HandlerInput<'_>, response: &Response) -> Result<(), HandlerError> {
        tracing::info!(
            request_id = %input.request().id(),
            speech = response.speech_text(),
            directives = response.directives.len(),
            should_end_session = ?response.should_end_session,
            "response sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MessageKey;
    use crate::request::SkillRequest;
    use quiz_core::model::{Locale, SessionAttributes, SessionId};
    use quiz_core::time::fixed_clock;

    #[test]
    fn localization_binds_request_language() {
        let request = SkillRequest::launch(Locale::parse("es-MX").unwrap(), SessionId::new("s"));
        let mut attrs = SessionAttributes::new();
        let mut input = HandlerInput::new(&request, &mut attrs, fixed_clock());
        assert_eq!(input.translator().language(), "en");

        LocalizationInterceptor::default().process(&mut input).unwrap();

        assert_eq!(input.translator().language(), "es");
        assert_eq!(input.t(MessageKey::Goodbye, &[]), "¡Adiós!");
    }

    #[test]
    fn logging_interceptors_never_fail() {
        let request = SkillRequest::launch(Locale::en_us(), SessionId::new("s"));
        let mut attrs = SessionAttributes::new();
        let mut input = HandlerInput::new(&request, &mut attrs, fixed_clock());
        assert!(RequestLoggingInterceptor.process(&mut input).is_ok());
        assert!(
            ResponseLoggingInterceptor
                .process(&input, &Response::empty())
                .is_ok()
        );
    }
}
