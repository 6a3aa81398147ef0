//! Concurrency-safe session storage.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::session::Session;

/// Shared map of live sessions keyed by session id.
///
/// Cloning the registry clones the handle, not the sessions; all clones see
/// the same map. Every operation takes the lock once and releases it before
/// returning, so callers never hold the lock across an await point of their
/// own.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a session, replacing any existing session with the same id.
    ///
    /// The session's idle clock is reset at insertion.
    pub async fn insert(&self, mut session: Session) {
        session.stamp();
        let id = session.id().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), session);

        tracing::debug!(session_id = %id, total = sessions.len(), "Registered session");
    }

    /// Get a snapshot of a session.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Mutate a session in place under the write lock.
    ///
    /// Returns `None` if the session is absent, otherwise the closure's
    /// result. The closure runs while the lock is held, so it must not block.
    pub async fn update<F, R>(&self, session_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(session_id).map(f)
    }

    /// Remove a session. Removing an absent id is a no-op.
    pub async fn remove(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id)
    }

    /// Remove every session idle for longer than `ttl`, in one atomic scan.
    ///
    /// Returns the number of sessions evicted.
    pub async fn sweep_expired(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before_count = sessions.len();

        sessions.retain(|_, session| session.idle_time() <= ttl);

        let removed = before_count - sessions.len();
        if removed > 0 {
            tracing::info!(
                removed = removed,
                remaining = sessions.len(),
                "Swept expired sessions"
            );
        }
        removed
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Returns true if a session with the given id is live.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlAction;
    use crate::session::{ExpireMode, PageContent};

    fn create_test_session(id: &str, page_count: usize) -> Session {
        Session::new(id, page_count, |_page: usize| PageContent::new())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;

        let session = registry.get("s1").await.unwrap();
        assert_eq!(session.id(), "s1");
        assert_eq!(session.page_count(), 3);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_replaces_existing() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;
        registry.insert(create_test_session("s1", 7)).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get("s1").await.unwrap().page_count(), 7);
    }

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;

        // Mutating the snapshot must not affect the stored session
        let mut snapshot = registry.get("s1").await.unwrap();
        snapshot.go_to(ControlAction::Next);

        assert_eq!(registry.get("s1").await.unwrap().current_page(), 0);
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;

        let page = registry
            .update("s1", |session| {
                session.go_to(ControlAction::Next);
                session.current_page()
            })
            .await;

        assert_eq!(page, Some(1));
        assert_eq!(registry.get("s1").await.unwrap().current_page(), 1);
    }

    #[tokio::test]
    async fn test_update_absent_session() {
        let registry = SessionRegistry::new();
        let result = registry.update("ghost", |_session| ()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;

        assert!(registry.remove("s1").await.is_some());
        assert!(registry.remove("s1").await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_evicts_only_expired() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("old", 3)).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        registry.insert(create_test_session("fresh", 3)).await;

        tokio::time::advance(Duration::from_secs(150)).await;

        // "old" has been idle 350s, "fresh" 150s
        let removed = registry.sweep_expired(Duration::from_secs(300)).await;
        assert_eq!(removed, 1);
        assert!(!registry.contains("old").await);
        assert!(registry.contains("fresh").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_eviction_is_strictly_greater() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1", 3)).await;

        tokio::time::advance(Duration::from_secs(300)).await;

        // Idle exactly at the ttl boundary survives
        assert_eq!(registry.sweep_expired(Duration::from_secs(300)).await, 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(registry.sweep_expired(Duration::from_secs(300)).await, 1);
        assert!(registry.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_restamps_idle_clock() {
        let registry = SessionRegistry::new();

        let mut session = create_test_session("s1", 3);
        session.go_to(ControlAction::Next);
        tokio::time::advance(Duration::from_secs(400)).await;

        // The session object is 400s old, but insertion resets its idle clock
        registry.insert(session).await;
        assert_eq!(registry.sweep_expired(Duration::from_secs(300)).await, 0);
        assert!(registry.contains("s1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touched_session_survives_sweep() {
        let registry = SessionRegistry::new();
        registry
            .insert(create_test_session("s1", 3).with_expire_mode(ExpireMode::AfterLastUsage))
            .await;

        tokio::time::advance(Duration::from_secs(250)).await;
        registry
            .update("s1", |session| {
                session.go_to(ControlAction::Next);
                session.touch();
            })
            .await;

        tokio::time::advance(Duration::from_secs(250)).await;

        // Idle 250s since the touch, 500s since insertion
        assert_eq!(registry.sweep_expired(Duration::from_secs(300)).await, 0);
        assert!(registry.contains("s1").await);
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let registry = SessionRegistry::new();

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .insert(create_test_session(&format!("s{}", i), 3))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 16);
    }
}
