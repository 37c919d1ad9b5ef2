//! In-memory registry of live sessions

use super::Session;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Sessions untouched for this long are dropped on the next `create`
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Shared handle to one session.
///
/// Holding the lock serializes every interaction with that session,
/// including the provider call.
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    handle: SessionHandle,
    last_used: Instant,
}

/// Sessions keyed by id, dropped on removal, after sitting idle, or at
/// process exit
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Start a new empty session, first dropping any that have gone idle
    pub fn create(&self) -> (String, SessionHandle) {
        let id = uuid::Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::new(id.clone())));

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_used.elapsed() < self.idle_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, remaining = sessions.len(), "Expired idle sessions");
        }
        sessions.insert(
            id.clone(),
            Entry {
                handle: handle.clone(),
                last_used: Instant::now(),
            },
        );
        drop(sessions);

        tracing::debug!(session_id = %id, "Session created");
        (id, handle)
    }

    /// Look up a session and mark it as used
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(entry.handle.clone())
    }

    /// End a session. Returns false if it did not exist.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(id)
            .is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session ended");
        }
        removed
    }

    #[allow(dead_code)] // Used by tests
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Turn;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let (id, handle) = store.create();
        assert_eq!(store.len(), 1);
        assert_eq!(handle.lock().await.id(), id);

        handle.lock().await.append(Turn::user("hello"));
        let again = store.get(&id).unwrap();
        assert_eq!(again.lock().await.len(), 1);

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.get(&id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (a, handle_a) = store.create();
        let (b, handle_b) = store.create();
        assert_ne!(a, b);

        handle_a.lock().await.append(Turn::user("only in a"));
        assert_eq!(handle_a.lock().await.len(), 1);
        assert!(handle_b.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_dropped_on_create() {
        let store = SessionStore::with_idle_ttl(Duration::from_millis(200));
        let (stale, _) = store.create();
        let (active, _) = store.create();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.get(&active).is_some());
        tokio::time::sleep(Duration::from_millis(120)).await;

        let (fresh, _) = store.create();
        assert_eq!(store.len(), 2);
        assert!(store.get(&stale).is_none());
        assert!(store.get(&active).is_some());
        assert!(store.get(&fresh).is_some());
    }

    #[tokio::test]
    async fn test_expired_session_handle_stays_usable() {
        let store = SessionStore::with_idle_ttl(Duration::ZERO);
        let (id, handle) = store.create();
        store.create();

        assert!(store.get(&id).is_none());
        handle.lock().await.append(Turn::user("still here"));
        assert_eq!(handle.lock().await.len(), 1);
    }
}
