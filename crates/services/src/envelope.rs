//! JSON envelopes exchanged with the voice platform.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! platform payload is ignored on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use quiz_core::model::{Locale, RequestId, SessionAttributes, SessionId};

use crate::request::{Intent, RequestKind, SkillRequest};
use crate::response::Response;

pub const ENVELOPE_VERSION: &str = "1.0";

//
// ─── REQUEST ENVELOPE ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<SessionEnvelope>,
    #[serde(default)]
    pub context: Option<ContextEnvelope>,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnvelope {
    pub session_id: String,
    #[serde(default)]
    pub new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextEnvelope {
    #[serde(rename = "System", default)]
    pub system: Option<SystemEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemEnvelope {
    #[serde(default)]
    pub device: Option<DeviceEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEnvelope {
    #[serde(default)]
    pub supported_interfaces: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentBody {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, SlotBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl RequestEnvelope {
    /// Session id carried by the envelope, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session
            .as_ref()
            .map(|session| SessionId::new(session.session_id.clone()))
    }

    /// Lift the envelope into a [`SkillRequest`] plus the session attributes
    /// it carried.
    ///
    /// A missing or malformed locale is replaced with `default_locale`. A
    /// missing session gets a generated id and counts as new.
    #[must_use]
    pub fn into_parts(self, default_locale: &Locale) -> (SkillRequest, Option<SessionAttributes>) {
        let Self {
            session,
            context,
            request: body,
            ..
        } = self;

        let locale = match body.locale.as_deref().map(Locale::parse) {
            Some(Ok(locale)) => locale,
            Some(Err(error)) => {
                tracing::warn!(error = %error, fallback = %default_locale, "unusable request locale");
                default_locale.clone()
            }
            None => default_locale.clone(),
        };

        let kind = match body.kind.as_str() {
            "LaunchRequest" => RequestKind::Launch,
            "SessionEndedRequest" => RequestKind::SessionEnded {
                reason: body.reason,
            },
            "IntentRequest" => match body.intent {
                Some(intent) => RequestKind::Intent(intent.into_intent()),
                None => RequestKind::Unknown(body.kind.clone()),
            },
            _ => RequestKind::Unknown(body.kind.clone()),
        };

        let (session_id, new_session, attributes) = match session {
            Some(session) => (
                SessionId::new(session.session_id),
                session.new,
                session.attributes.map(SessionAttributes::from_map),
            ),
            None => (SessionId::generate(), true, None),
        };

        let mut request = SkillRequest::new(kind, locale, session_id).with_new_session(new_session);
        if let Some(id) = body.request_id {
            request = request.with_id(RequestId::new(id));
        }
        if let Some(timestamp) = body.timestamp {
            request = request.with_timestamp(timestamp);
        }
        let interfaces = context
            .and_then(|context| context.system)
            .and_then(|system| system.device)
            .map(|device| device.supported_interfaces)
            .unwrap_or_default();
        for interface in interfaces.keys() {
            request = request.with_interface(interface.clone());
        }

        (request, attributes)
    }
}

impl IntentBody {
    fn into_intent(self) -> Intent {
        self.slots
            .into_iter()
            .filter_map(|(name, slot)| slot.value.map(|value| (name, value)))
            .fold(Intent::new(self.name), |intent, (name, value)| {
                intent.with_slot(name, value)
            })
    }
}

//
// ─── RESPONSE ENVELOPE ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default)]
    pub session_attributes: SessionAttributes,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub ssml: String,
}

impl OutputSpeech {
    #[must_use]
    pub fn ssml(text: &str) -> Self {
        Self {
            kind: "SSML".to_owned(),
            ssml: format!("<speak>{}</speak>", escape_ssml(text)),
        }
    }
}

impl ResponseEnvelope {
    #[must_use]
    pub fn new(response: Response, session_attributes: SessionAttributes) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_owned(),
            session_attributes,
            response: ResponseBody {
                output_speech: response.speech.as_deref().map(OutputSpeech::ssml),
                reprompt: response.reprompt.as_deref().map(|text| Reprompt {
                    output_speech: OutputSpeech::ssml(text),
                }),
                directives: response.directives,
                should_end_session: response.should_end_session,
            },
        }
    }
}

/// Escape text for embedding in SSML.
#[must_use]
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
