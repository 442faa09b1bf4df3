use chrono::Duration;
use quiz_core::model::Locale;

use crate::directives::AplDirectiveBuilder;

/// Knobs for assembling the skill and its runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    /// Locale assumed when a request does not carry a usable one.
    pub default_locale: Locale,
    /// Attach visual directives for devices that can render them.
    pub directives_enabled: bool,
    pub directive_token: String,
    /// Stored sessions idle for longer than this are dropped. `None` keeps
    /// them until the session ends.
    pub session_ttl: Option<Duration>,
}

impl SkillConfig {
    pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 15;
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::en_us(),
            directives_enabled: true,
            directive_token: AplDirectiveBuilder::DEFAULT_TOKEN.to_owned(),
            session_ttl: Some(Duration::minutes(Self::DEFAULT_SESSION_TTL_MINUTES)),
        }
    }
}

impl SkillConfig {
    #[must_use]
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    #[must_use]
    pub fn with_directives(mut self, enabled: bool) -> Self {
        self.directives_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_directive_token(mut self, token: impl Into<String>) -> Self {
        self.directive_token = token.into();
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_ttl = ttl;
        self
    }
}
