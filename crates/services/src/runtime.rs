//! Glue between the platform envelope, session storage and the dispatcher.

use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::SessionAttributes;
use storage::SessionStore;

use crate::config::SkillConfig;
use crate::dispatch::{HandlerInput, Skill};
use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::RuntimeError;
use crate::request::{RequestKind, SkillRequest};
use crate::response::Response;

/// Runs a [`Skill`] against stored session attributes.
///
/// Requests for the same session are serialized on the session lock; requests
/// for different sessions run independently.
pub struct SkillRuntime {
    skill: Skill,
    store: Arc<dyn SessionStore>,
    clock: Clock,
    config: SkillConfig,
}

impl SkillRuntime {
    #[must_use]
    pub fn new(skill: Skill, store: Arc<dyn SessionStore>, config: SkillConfig) -> Self {
        Self {
            skill,
            store,
            clock: Clock::system(),
            config,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Dispatch one request and return the response with the session's
    /// attributes as they stand afterwards.
    ///
    /// Attributes sent along with the request replace the stored ones; a new
    /// session starts from an empty map. Sessions that end are discarded, and
    /// sessions idle past the configured TTL are evicted first.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the session store fails. Handler
    /// failures never surface here.
    pub fn handle_request(
        &self,
        request: &SkillRequest,
        incoming: Option<SessionAttributes>,
    ) -> Result<(Response, SessionAttributes), RuntimeError> {
        let session_id = request.session_id();
        if let Some(ttl) = self.config.session_ttl {
            self.store.evict_idle(self.clock.idle_cutoff(ttl))?;
        }
        let handle = self.store.session(session_id, self.clock.now())?;
        let mut attributes = handle.lock()?;

        if request.is_new_session() {
            attributes.clear();
        }
        if let Some(incoming) = incoming {
            *attributes = incoming;
        }

        let mut input = HandlerInput::new(request, &mut attributes, self.clock);
        let response = self.skill.dispatch(&mut input);
        let snapshot = attributes.clone();
        drop(attributes);

        let ended = matches!(request.kind(), RequestKind::SessionEnded { .. })
            || response.should_end_session == Some(true);
        if ended {
            self.store.discard(session_id)?;
        }

        Ok((response, snapshot))
    }

    /// Handle a decoded platform envelope.
    ///
    /// # Errors
    ///
    /// See [`SkillRuntime::handle_request`].
    pub fn handle(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, RuntimeError> {
        let (request, attributes) = envelope.into_parts(&self.config.default_locale);
        let (response, attributes) = self.handle_request(&request, attributes)?;
        Ok(ResponseEnvelope::new(response, attributes))
    }

    /// Handle a raw JSON request body and return the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Decode` for malformed input, plus anything
    /// [`SkillRuntime::handle`] returns.
    pub fn handle_json(&self, body: &str) -> Result<String, RuntimeError> {
        let envelope: RequestEnvelope = serde_json::from_str(body).map_err(RuntimeError::Decode)?;
        let response = self.handle(envelope)?;
        serde_json::to_string(&response).map_err(RuntimeError::Encode)
    }
}
