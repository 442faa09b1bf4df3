use serde_json::Value;

/// What the skill says back for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    /// Opaque render instructions, in the order they were added.
    pub directives: Vec<Value>,
    pub should_end_session: Option<bool>,
}

impl Response {
    /// A response with nothing to say, e.g. for a closed session.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Speech text or `""` when silent.
    #[must_use]
    pub fn speech_text(&self) -> &str {
        self.speech.as_deref().unwrap_or_default()
    }

    /// Whether the platform should keep listening after this response.
    #[must_use]
    pub fn keeps_session_open(&self) -> bool {
        self.should_end_session == Some(false)
    }
}

/// Fluent builder for [`Response`].
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.response.speech = Some(text.into());
        self
    }

    /// Set the reprompt. Unless set explicitly, this also keeps the session open.
    #[must_use]
    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.response.reprompt = Some(text.into());
        if self.response.should_end_session.is_none() {
            self.response.should_end_session = Some(false);
        }
        self
    }

    #[must_use]
    pub fn add_directive(mut self, directive: Value) -> Self {
        self.response.directives.push(directive);
        self
    }

    /// Append a directive when one was produced.
    #[must_use]
    pub fn add_optional_directive(self, directive: Option<Value>) -> Self {
        match directive {
            Some(directive) => self.add_directive(directive),
            None => self,
        }
    }

    #[must_use]
    pub fn with_should_end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }

    #[must_use]
    pub fn build(self) -> Response {
        self.response
    }
}
