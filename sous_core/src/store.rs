//! In-memory registry of active cooking sessions.
//!
//! The registry map and each session sit behind separate locks. The map lock
//! is held only long enough to look up, insert or remove a handle; all session
//! work happens under that session's own mutex, so operations on one id are
//! serialized while different sessions never wait on each other.
//!
//! Ending a session marks it under its own lock before the handle leaves the
//! map. A caller that fetched the handle earlier sees the mark once it gets
//! the lock and fails with `SessionNotFound`.

use crate::session::CookingSession;
use crate::steps::StepSequence;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use uuid::Uuid;

/// Shared handle to one session; lock it to operate on the session.
pub type SessionHandle = Arc<Mutex<CookingSession>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

/// Lock a session, recovering the guard if a previous holder panicked.
pub fn lock_session(handle: &SessionHandle) -> MutexGuard<'_, CookingSession> {
    handle.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Recovering poisoned session lock");
        poisoned.into_inner()
    })
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a fresh session on step 1 with no timer.
    pub fn create(
        &self,
        steps: StepSequence,
        recipe_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> SessionHandle {
        let id = Uuid::new_v4();
        let session = CookingSession::new(id, recipe_name, steps, now);
        let handle = Arc::new(Mutex::new(session));

        self.write_map().insert(id, Arc::clone(&handle));
        tracing::info!("Created cooking session {}", id);
        handle
    }

    /// Handle for `id`. The session may be ended by the time it is locked.
    pub fn get(&self, id: Uuid) -> Result<SessionHandle> {
        self.read_map()
            .get(&id)
            .cloned()
            .ok_or(Error::SessionNotFound(id))
    }

    /// Run `f` with exclusive access to the session `id`.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CookingSession) -> Result<R>,
    ) -> Result<R> {
        let handle = self.get(id)?;
        let mut session = lock_session(&handle);
        if session.is_ended() {
            return Err(Error::SessionNotFound(id));
        }
        f(&mut session)
    }

    /// End and remove a session. Idempotent.
    ///
    /// Returns the handle only to the caller that actually ended it.
    pub fn evict(&self, id: Uuid) -> Option<SessionHandle> {
        let handle = self.write_map().remove(&id)?;
        if !lock_session(&handle).end() {
            return None;
        }
        tracing::info!("Evicted cooking session {}", id);
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.read_map().keys().copied().collect()
    }

    /// Evict every session whose last activity is more than `max_idle` before `now`.
    ///
    /// The idle check and the end mark happen under the session's lock, so a
    /// session touched concurrently is never swept. Returns the handles this
    /// call ended so callers can journal them.
    pub fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> Vec<SessionHandle> {
        let snapshot: Vec<(Uuid, SessionHandle)> = self
            .read_map()
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect();

        let ended: Vec<(Uuid, SessionHandle)> = snapshot
            .into_iter()
            .filter(|(_, handle)| {
                let mut session = lock_session(handle);
                now - session.last_activity() > max_idle && session.end()
            })
            .collect();

        if ended.is_empty() {
            return Vec::new();
        }

        let mut map = self.write_map();
        for (id, handle) in &ended {
            if map.get(id).is_some_and(|current| Arc::ptr_eq(current, handle)) {
                map.remove(id);
            }
        }
        drop(map);

        tracing::info!("Evicted {} idle cooking session(s)", ended.len());
        ended.into_iter().map(|(_, handle)| handle).collect()
    }
}
