use chrono::{DateTime, Utc};
use quiz_core::model::{SessionAttributes, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by session stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session store lock poisoned: {0}")]
    Poisoned(String),
}

/// Shared, lockable attribute map for one session.
///
/// Holding the guard returned by [`SessionHandle::lock`] serializes every
/// other request for the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<Mutex<SessionAttributes>>);

impl SessionHandle {
    #[must_use]
    pub fn new(attributes: SessionAttributes) -> Self {
        Self(Arc::new(Mutex::new(attributes)))
    }

    /// Lock the session for the duration of one request.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, SessionAttributes>, StorageError> {
        self.0
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))
    }
}

/// Store contract for per-session attributes.
pub trait SessionStore: Send + Sync {
    /// Handle to the session's attributes, created empty on first use.
    /// `now` is recorded as the session's last activity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be accessed.
    fn session(&self, id: &SessionId, now: DateTime<Utc>) -> Result<SessionHandle, StorageError>;

    /// Snapshot of the session's attributes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session was never opened.
    fn get(&self, id: &SessionId) -> Result<SessionAttributes, StorageError>;

    /// Drop everything kept for the session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be accessed.
    fn discard(&self, id: &SessionId) -> Result<(), StorageError>;

    /// Drop sessions with no activity since `idle_since`. Returns how many
    /// were dropped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be accessed.
    fn evict_idle(&self, idle_since: DateTime<Utc>) -> Result<usize, StorageError>;
}

#[derive(Debug, Clone)]
struct SessionEntry {
    handle: SessionHandle,
    last_touched: DateTime<Utc>,
}

/// In-memory session store: one mutex per session behind a map lock.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionEntry>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionEntry>>, StorageError> {
        self.sessions
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))
    }

    /// Number of sessions currently held.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if the map lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.sessions()?.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if the map lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.sessions()?.is_empty())
    }
}

impl SessionStore for InMemorySessionStore {
    fn session(&self, id: &SessionId, now: DateTime<Utc>) -> Result<SessionHandle, StorageError> {
        let mut guard = self.sessions()?;
        let entry = guard.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(session_id = %id, "opening session");
            SessionEntry {
                handle: SessionHandle::default(),
                last_touched: now,
            }
        });
        entry.last_touched = entry.last_touched.max(now);
        Ok(entry.handle.clone())
    }

    fn get(&self, id: &SessionId) -> Result<SessionAttributes, StorageError> {
        let handle = self
            .sessions()?
            .get(id)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| StorageError::NotFound(id.clone()))?;
        let attributes = handle.lock()?.clone();
        Ok(attributes)
    }

    fn discard(&self, id: &SessionId) -> Result<(), StorageError> {
        if self.sessions()?.remove(id).is_some() {
            tracing::debug!(session_id = %id, "discarded session");
        }
        Ok(())
    }

    fn evict_idle(&self, idle_since: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut guard = self.sessions()?;
        let before = guard.len();
        guard.retain(|_, entry| entry.last_touched >= idle_since);
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::debug!(evicted, %idle_since, "evicted idle sessions");
        }
        Ok(evicted)
    }
}
