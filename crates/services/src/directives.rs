//! Visual render directives for screen-capable devices.

use serde_json::{Value, json};
use std::fmt;

const DOCUMENT_BASE: &str = "doc://alexa/apl/documents/";

/// Visual document shown for each dialogue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentId {
    Welcome,
    Hello,
    Help,
    Start,
    Finish,
    Correct,
    Incorrect,
}

impl DocumentId {
    /// Name of the document as published with the skill.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "bienvenido",
            Self::Hello => "hola",
            Self::Help => "ayuda",
            Self::Start => "iniciar",
            Self::Finish => "fin",
            Self::Correct => "correcta",
            Self::Incorrect => "incorrecta",
        }
    }

    #[must_use]
    pub fn source(self) -> String {
        format!("{DOCUMENT_BASE}{}", self.as_str())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data source carrying the single line of text the documents display.
#[must_use]
pub fn screen_data(primary_text: &str) -> Value {
    json!({
        "quizDataSource": {
            "primaryText": primary_text,
        }
    })
}

/// Builds an opaque directive for a document and its data.
pub trait DirectiveBuilder: Send + Sync {
    fn build(&self, document: DocumentId, data_source: Value) -> Value;
}

/// Produces `RenderDocument` directives that link to published documents.
#[derive(Debug, Clone)]
pub struct AplDirectiveBuilder {
    token: String,
}

impl AplDirectiveBuilder {
    pub const DEFAULT_TOKEN: &'static str = "documentToken";

    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Default for AplDirectiveBuilder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOKEN)
    }
}

impl DirectiveBuilder for AplDirectiveBuilder {
    fn build(&self, document: DocumentId, data_source: Value) -> Value {
        json!({
            "type": "Alexa.Presentation.APL.RenderDocument",
            "token": self.token,
            "document": {
                "type": "Link",
                "src": document.source(),
            },
            "datasources": data_source,
        })
    }
}
