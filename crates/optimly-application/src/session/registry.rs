use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory map of live sessions.
///
/// Each entry is independent, so several onboarding or prompt lab sessions
/// (one per open tab) can run side by side. Nothing is persisted.
pub struct SessionRegistry<T> {
    sessions: Arc<RwLock<HashMap<String, Arc<T>>>>,
}

impl<T> SessionRegistry<T> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores `session` under a fresh id and returns the id.
    pub async fn register(&self, session: Arc<T>) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<T>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    pub async fn remove(&self, session_id: &str) -> Option<Arc<T>> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.clear();
    }
}

impl<T> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SessionRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_get_remove() {
        let registry = SessionRegistry::new();
        let a = registry.register(Arc::new("tab a")).await;
        let b = registry.register(Arc::new("tab b")).await;
        assert_ne!(a, b);
        assert_eq!(registry.len().await, 2);

        assert_eq!(*registry.get(&a).await.unwrap(), "tab a");
        assert!(registry.remove(&a).await.is_some());
        assert!(registry.get(&a).await.is_none());
        assert!(registry.remove(&a).await.is_none());

        registry.clear().await;
        assert!(registry.is_empty().await);
    }
}
