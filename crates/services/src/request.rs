use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use quiz_core::model::{Locale, RequestId, SessionId};

/// Interface name the platform reports for screen-capable devices.
pub const APL_INTERFACE: &str = "Alexa.Presentation.APL";

//
// ─── REQUEST KIND ──────────────────────────────────────────────────────────────
//

/// A named intent with its resolved slot values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    name: String,
    slots: BTreeMap<String, String>,
}

impl Intent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn slots(&self) -> &BTreeMap<String, String> {
        &self.slots
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent(Intent),
    SessionEnded { reason: Option<String> },
    /// Any request type this skill has no model for.
    Unknown(String),
}

impl RequestKind {
    /// Platform name of the request type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Launch => "LaunchRequest",
            Self::Intent(_) => "IntentRequest",
            Self::SessionEnded { .. } => "SessionEndedRequest",
            Self::Unknown(name) => name,
        }
    }
}

//
// ─── SKILL REQUEST ─────────────────────────────────────────────────────────────
//

/// One inbound event, already lifted out of the platform envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRequest {
    id: RequestId,
    session_id: SessionId,
    new_session: bool,
    kind: RequestKind,
    locale: Locale,
    supported_interfaces: BTreeSet<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl SkillRequest {
    #[must_use]
    pub fn new(kind: RequestKind, locale: Locale, session_id: SessionId) -> Self {
        Self {
            id: RequestId::generate(),
            session_id,
            new_session: false,
            kind,
            locale,
            supported_interfaces: BTreeSet::new(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn launch(locale: Locale, session_id: SessionId) -> Self {
        Self::new(RequestKind::Launch, locale, session_id).with_new_session(true)
    }

    #[must_use]
    pub fn intent(intent: Intent, locale: Locale, session_id: SessionId) -> Self {
        Self::new(RequestKind::Intent(intent), locale, session_id)
    }

    #[must_use]
    pub fn session_ended(reason: Option<String>, locale: Locale, session_id: SessionId) -> Self {
        Self::new(RequestKind::SessionEnded { reason }, locale, session_id)
    }

    #[must_use]
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_new_session(mut self, new_session: bool) -> Self {
        self.new_session = new_session;
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.supported_interfaces.insert(interface.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn is_new_session(&self) -> bool {
        self.new_session
    }

    #[must_use]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    #[must_use]
    pub fn request_type(&self) -> &str {
        self.kind.type_name()
    }

    #[must_use]
    pub fn as_intent(&self) -> Option<&Intent> {
        match &self.kind {
            RequestKind::Intent(intent) => Some(intent),
            _ => None,
        }
    }

    #[must_use]
    pub fn intent_name(&self) -> Option<&str> {
        self.as_intent().map(Intent::name)
    }

    /// True for an intent request whose name is `name`.
    #[must_use]
    pub fn is_intent(&self, name: &str) -> bool {
        self.intent_name() == Some(name)
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.as_intent().and_then(|intent| intent.slot(name))
    }

    #[must_use]
    pub fn supports(&self, interface: &str) -> bool {
        self.supported_interfaces.contains(interface)
    }

    /// Whether the device can render visual documents.
    #[must_use]
    pub fn supports_apl(&self) -> bool {
        self.supports(APL_INTERFACE)
    }
}
