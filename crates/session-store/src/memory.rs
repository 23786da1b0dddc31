use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Result, SessionKey, store::SessionStore};

/// In-memory session store.
///
/// Stores values per session in a shared map. Clones share the same
/// underlying data.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, HashMap<String, Value>>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sessions holding at least one value.
    pub async fn session_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|values| !values.is_empty())
            .count()
    }

    /// Clears all sessions.
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session: &SessionKey, name: &str) -> Result<Option<Value>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session)
            .and_then(|values| values.get(name))
            .cloned())
    }

    async fn store(&self, session: &SessionKey, name: &str, value: Value) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session.clone())
            .or_default()
            .insert(name.to_string(), value);
        tracing::trace!(%session, name, "session value stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionStoreExt;
    use serde_json::json;

    #[tokio::test]
    async fn load_missing_returns_none() {
        let store = InMemorySessionStore::new();
        let session = SessionKey::generate();

        let value = store.load(&session, "cart.session").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn store_then_load() {
        let store = InMemorySessionStore::new();
        let session = SessionKey::generate();

        store
            .store(&session, "cart.session", json!({"a": 1}))
            .await
            .unwrap();

        let value = store.load(&session, "cart.session").await.unwrap();
        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn values_are_scoped_to_session() {
        let store = InMemorySessionStore::new();
        let alice = SessionKey::new("alice");
        let bob = SessionKey::new("bob");

        store.store(&alice, "cart.session", json!([1])).await.unwrap();

        assert!(store.load(&bob, "cart.session").await.unwrap().is_none());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn values_are_scoped_to_name() {
        let store = InMemorySessionStore::new();
        let session = SessionKey::generate();

        store.store(&session, "cart.session", json!(1)).await.unwrap();
        store.store(&session, "wishlist", json!(2)).await.unwrap();

        assert_eq!(
            store.load(&session, "cart.session").await.unwrap(),
            Some(json!(1))
        );
        assert_eq!(
            store.load(&session, "wishlist").await.unwrap(),
            Some(json!(2))
        );
    }

    #[tokio::test]
    async fn null_counts_as_absent_for_typed_access() {
        let store = InMemorySessionStore::new();
        let session = SessionKey::generate();

        store.store(&session, "cart.session", Value::Null).await.unwrap();

        let typed: Option<Vec<u32>> = store.load_as(&session, "cart.session").await.unwrap();
        assert!(typed.is_none());
        assert!(!store.has(&session, "cart.session").await.unwrap());
    }

    #[tokio::test]
    async fn typed_roundtrip() {
        let store = InMemorySessionStore::new();
        let session = SessionKey::generate();

        store
            .store_as(&session, "numbers", &vec![1u32, 2, 3])
            .await
            .unwrap();

        let loaded: Option<Vec<u32>> = store.load_as(&session, "numbers").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = InMemorySessionStore::new();
        let clone = store.clone();
        let session = SessionKey::generate();

        clone.store(&session, "cart.session", json!(true)).await.unwrap();

        assert!(store.has(&session, "cart.session").await.unwrap());
        store.clear().await;
        assert_eq!(clone.session_count().await, 0);
    }
}
