use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocaleError {
    #[error("locale cannot be empty")]
    Empty,

    #[error("invalid locale tag: {0}")]
    Invalid(String),
}

/// Language/region tag such as `en-US` or `es`.
///
/// Only the `ll` and `ll-RR` shapes are accepted. The language subtag is
/// normalized to lowercase and the region to uppercase, so `es_es` and
/// `ES-es` both become `es-ES`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parse a locale tag.
    ///
    /// # Errors
    ///
    /// Returns `LocaleError::Empty` for blank input and `LocaleError::Invalid`
    /// when the tag is not `ll` or `ll-RR`.
    pub fn parse(raw: &str) -> Result<Self, LocaleError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut parts = raw.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        let region = parts.next();
        if parts.next().is_some() {
            return Err(LocaleError::Invalid(raw.to_owned()));
        }

        let is_alpha = |s: &str, min: usize, max: usize| {
            (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
        };
        if !is_alpha(language, 2, 3) {
            return Err(LocaleError::Invalid(raw.to_owned()));
        }
        if let Some(region) = region {
            if !is_alpha(region, 2, 2) {
                return Err(LocaleError::Invalid(raw.to_owned()));
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region: region.map(str::to_ascii_uppercase),
        })
    }

    /// Lowercase language subtag, e.g. `en`.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub fn en_us() -> Self {
        Self {
            language: "en".into(),
            region: Some("US".into()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.to_string()
    }
}
