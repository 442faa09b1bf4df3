//! Locale-keyed message templates with `%s` substitution.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use quiz_core::model::Locale;

/// Language used when a locale has no catalog of its own.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Every message the skill can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Welcome,
    Hello,
    Help,
    Goodbye,
    Reflector,
    Fallback,
    Error,
    Start,
    Correct,
    Incorrect,
    Options,
    Summary,
}

impl MessageKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "WELCOME_MESSAGE",
            Self::Hello => "HELLO_MESSAGE",
            Self::Help => "HELP_MESSAGE",
            Self::Goodbye => "GOODBYE_MESSAGE",
            Self::Reflector => "REFLECTOR_MESSAGE",
            Self::Fallback => "FALLBACK_MESSAGE",
            Self::Error => "ERROR_MESSAGE",
            Self::Start => "START_MESSAGE",
            Self::Correct => "CORRECT_MESSAGE",
            Self::Incorrect => "INCORRECT_MESSAGE",
            Self::Options => "OPTIONS_MESSAGE",
            Self::Summary => "SUMMARY_MESSAGE",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EN: &[(MessageKey, &str)] = &[
    (
        MessageKey::Welcome,
        "Welcome to the general knowledge quiz! Say start the game when you are ready.",
    ),
    (MessageKey::Hello, "Hello World!"),
    (
        MessageKey::Help,
        "You can say start the game to play, or answer a question with its option number. How can I help?",
    ),
    (MessageKey::Goodbye, "Goodbye!"),
    (MessageKey::Reflector, "You just triggered %s"),
    (
        MessageKey::Fallback,
        "Sorry, I don't know about that. Please try again.",
    ),
    (
        MessageKey::Error,
        "Sorry, there was an error. Please try again.",
    ),
    (
        MessageKey::Start,
        "The game has started. Good luck with the questions!",
    ),
    (MessageKey::Correct, "Correct answer! Very good!"),
    (
        MessageKey::Incorrect,
        "Incorrect response. The correct answer is option number %s.",
    ),
    (MessageKey::Options, "The options are: %s"),
    (
        MessageKey::Summary,
        "You answered %s of %s questions correctly. Your average is %s%.",
    ),
];

const ES: &[(MessageKey, &str)] = &[
    (
        MessageKey::Welcome,
        "¡Bienvenido a la Skill de preguntas de cultura general! ¿Estás listo para comenzar?",
    ),
    (MessageKey::Hello, "Hola, ¿como te encuentras?"),
    (
        MessageKey::Help,
        "Puedes decir comenzar el juego para jugar, o responder una pregunta con el número de la opción. ¿Cómo te puedo ayudar?",
    ),
    (MessageKey::Goodbye, "¡Adiós!"),
    (MessageKey::Reflector, "Acabas de activar %s"),
    (
        MessageKey::Fallback,
        "Lo siento, no sé nada sobre eso. Por favor inténtalo otra vez.",
    ),
    (
        MessageKey::Error,
        "Lo siento, ha habido un problema. Por favor inténtalo otra vez.",
    ),
    (
        MessageKey::Start,
        "El juego ha comenzado. ¡Buena suerte con las preguntas!",
    ),
    (MessageKey::Correct, "¡Respuesta correcta! ¡Muy bien!"),
    (
        MessageKey::Incorrect,
        "Respuesta incorrecta. La respuesta correcta es la opción número %s.",
    ),
    (MessageKey::Options, "Las opciones son: %s"),
    (
        MessageKey::Summary,
        "Has respondido correctamente %s de %s preguntas. Tu promedio es del %s%.",
    ),
];

static BUILTIN: LazyLock<Arc<MessageCatalog>> =
    LazyLock::new(|| Arc::new(MessageCatalog::builtin()));

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Message templates per language.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    languages: HashMap<String, HashMap<MessageKey, String>>,
}

impl MessageCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The English and Spanish strings shipped with the skill.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (language, table) in [("en", EN), ("es", ES)] {
            for (key, template) in table {
                catalog.insert(language, *key, *template);
            }
        }
        catalog
    }

    /// Shared instance of [`MessageCatalog::builtin`].
    #[must_use]
    pub fn shared_builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn insert(&mut self, language: &str, key: MessageKey, template: impl Into<String>) {
        self.languages
            .entry(language.to_ascii_lowercase())
            .or_default()
            .insert(key, template.into());
    }

    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Template for `key`, looked up in `language` and then the fallback language.
    #[must_use]
    pub fn template(&self, language: &str, key: MessageKey) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|table| table.get(&key))
            .or_else(|| {
                self.languages
                    .get(FALLBACK_LANGUAGE)
                    .and_then(|table| table.get(&key))
            })
            .map(String::as_str)
    }
}

//
// ─── TRANSLATOR ────────────────────────────────────────────────────────────────
//

/// Resolves message keys to text for one request.
pub trait Localizer {
    fn t(&self, key: MessageKey, args: &[&str]) -> String;
}

/// A catalog bound to one language.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<MessageCatalog>,
    language: String,
}

impl Translator {
    /// Bind `catalog` to the language of `locale`, falling back to English
    /// when the catalog has nothing for it.
    #[must_use]
    pub fn new(catalog: Arc<MessageCatalog>, locale: &Locale) -> Self {
        let language = if catalog.supports(locale.language()) {
            locale.language()
        } else {
            FALLBACK_LANGUAGE
        };
        Self {
            catalog,
            language: language.to_owned(),
        }
    }

    /// Built-in catalog in the fallback language.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            catalog: MessageCatalog::shared_builtin(),
            language: FALLBACK_LANGUAGE.to_owned(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::fallback()
    }
}

impl Localizer for Translator {
    fn t(&self, key: MessageKey, args: &[&str]) -> String {
        match self.catalog.template(&self.language, key) {
            Some(template) => format_template(template, args),
            None => {
                tracing::warn!(key = %key, language = %self.language, "missing message template");
                key.as_str().to_owned()
            }
        }
    }
}

/// Replace each `%s` in `template` with the next argument.
///
/// Missing arguments become empty strings and `%%` is a literal percent sign.
#[must_use]
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                out.push_str(args.next().copied().unwrap_or_default());
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}
