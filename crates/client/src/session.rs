use std::sync::Arc;

use api_types::user::User;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::store::{KeyValueStore, SESSION_KEY, StoreError};

/// The locally held record of who is logged in.
///
/// Persisted as JSON under [`SESSION_KEY`]. The password is never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub created_at: String,
}

impl Session {
    /// Value sent as `Authorization: Bearer <credential>`.
    ///
    /// This is the raw user id; the backend does not verify it.
    pub fn credential(&self) -> &str {
        &self.id
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct SessionState {
    user: Option<Session>,
    is_authenticated: bool,
}

/// Process-wide session state plus its persisted copy.
///
/// Setters overwrite unconditionally; last write wins.
#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionState>>,
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState::default())),
            store,
        }
    }

    /// Loads the persisted session, if any, into memory.
    ///
    /// An unreadable or corrupt entry leaves the store logged out.
    pub async fn restore(&self) -> Option<Session> {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!("Error initializing auth: {err}");
                return None;
            }
        };

        let session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => session,
            Err(err) => {
                tracing::error!("Error initializing auth: {err}");
                return None;
            }
        };

        let mut guard = self.inner.lock().await;
        guard.user = Some(session.clone());
        guard.is_authenticated = true;
        Some(session)
    }

    pub async fn user(&self) -> Option<Session> {
        self.inner.lock().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated
    }

    /// The current user, only when the session is marked authenticated.
    pub async fn authenticated_user(&self) -> Option<Session> {
        let guard = self.inner.lock().await;
        if guard.is_authenticated {
            guard.user.clone()
        } else {
            None
        }
    }

    pub async fn set_user(&self, user: Option<Session>) {
        self.inner.lock().await.user = user;
    }

    pub async fn set_is_authenticated(&self, is_authenticated: bool) {
        self.inner.lock().await.is_authenticated = is_authenticated;
    }

    /// Writes `session` to the local store.
    pub fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, &json)
    }

    /// Removes the persisted copy, then clears memory.
    ///
    /// The store is the copy read at start-up, so it goes first. Memory is
    /// cleared even if the removal fails.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let removed = self.store.remove(SESSION_KEY);
        let mut guard = self.inner.lock().await;
        guard.user = None;
        guard.is_authenticated = false;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn alice() -> Session {
        Session {
            id: "1".to_string(),
            username: "alice".to_string(),
            created_at: "2025-02-12T10:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn restore_reads_persisted_session() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(store.clone());
        sessions.persist(&alice()).unwrap();

        let fresh = SessionStore::new(store);
        assert!(!fresh.is_authenticated().await);
        assert_eq!(fresh.restore().await, Some(alice()));
        assert!(fresh.is_authenticated().await);
        assert_eq!(fresh.user().await, Some(alice()));
    }

    #[tokio::test]
    async fn restore_ignores_corrupt_entry() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSION_KEY, "{not json").unwrap();
        let sessions = SessionStore::new(store);
        assert_eq!(sessions.restore().await, None);
        assert!(!sessions.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_clears_store_and_memory() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(store.clone());
        sessions.persist(&alice()).unwrap();
        sessions.set_user(Some(alice())).await;
        sessions.set_is_authenticated(true).await;

        sessions.logout().await.unwrap();
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        assert_eq!(sessions.user().await, None);
        assert!(!sessions.is_authenticated().await);
    }

    #[tokio::test]
    async fn authenticated_user_requires_flag() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        sessions.set_user(Some(alice())).await;
        assert_eq!(sessions.authenticated_user().await, None);
        sessions.set_is_authenticated(true).await;
        assert_eq!(sessions.authenticated_user().await, Some(alice()));
    }

    #[test]
    fn persisted_form_has_no_password() {
        let user = User {
            id: "9".to_string(),
            username: "bob".to_string(),
            password: "hunter2".to_string(),
            created_at: String::new(),
        };
        let json = serde_json::to_string(&Session::from(&user)).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains(r#""id":"9""#));
    }
}
