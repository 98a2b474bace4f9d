use futures_signals::signal::Mutable;
use serde::{Deserialize, Serialize};
use webnovel_lib::models::User;

use crate::storage::{self, AUTH_TOKEN_KEY, SharedStorage, USER_KEY};

/// What survives a restart besides the token
#[derive(Debug, Default, Deserialize, Serialize)]
struct PersistedSession {
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
}

#[derive(Clone)]
pub struct AuthStore {
    storage: SharedStorage,
    token: Mutable<Option<String>>,
    user: Mutable<Option<User>>,
    is_loading: Mutable<bool>,
    error: Mutable<Option<String>>,
}

impl AuthStore {
    pub fn new(storage: SharedStorage) -> Self {
        let token = match storage.get_item(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!("failed to read auth token: {e}");
                None
            }
        };
        let session: PersistedSession =
            storage::load(storage.as_ref(), USER_KEY).unwrap_or_default();

        // a cached user without a token is a logged out session
        let user = if token.is_some() && session.is_authenticated {
            session.user
        } else {
            None
        };

        Self {
            storage,
            token: Mutable::new(token),
            user: Mutable::new(user),
            is_loading: Mutable::new(false),
            error: Mutable::new(None),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.get_cloned()
    }

    pub fn user(&self) -> Option<User> {
        self.user.get_cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock_ref().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get_cloned()
    }

    pub fn login(&self, user: User, token: String) {
        if let Err(e) = self.storage.set_item(AUTH_TOKEN_KEY, &token) {
            warn!("failed to persist auth token: {e}");
        }
        self.token.set(Some(token));
        self.user.set(Some(user));
        self.error.set(None);
        self.persist();
    }

    /// Refreshes the cached user without touching the token
    pub fn set_user(&self, user: User) {
        self.user.set(Some(user));
        self.persist();
    }

    pub fn logout(&self) {
        if let Err(e) = self.storage.remove_item(AUTH_TOKEN_KEY) {
            warn!("failed to remove auth token: {e}");
        }
        self.token.set(None);
        self.user.set(None);
        self.persist();
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.is_loading.set_neq(is_loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.error.set(error);
    }

    fn persist(&self) {
        let session = PersistedSession {
            user: self.user.get_cloned(),
            is_authenticated: self.is_authenticated(),
        };
        if let Err(e) = storage::save(self.storage.as_ref(), USER_KEY, &session) {
            warn!("failed to persist session: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    fn user() -> User {
        serde_json::from_str(r#"{"_id":"u1","username":"reader","email":"reader@example.com"}"#)
            .unwrap()
    }

    #[test]
    fn test_login_persists_and_restores() {
        let storage = MemoryStorage::shared();
        let store = AuthStore::new(storage.clone());
        assert!(!store.is_authenticated());

        store.login(user(), "jwt".to_string());
        assert!(store.is_authenticated());
        assert_eq!(
            storage.get_item(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("jwt")
        );

        let restored = AuthStore::new(storage);
        assert_eq!(restored.token().as_deref(), Some("jwt"));
        assert_eq!(restored.user().map(|u| u.username), Some("reader".to_string()));
    }

    #[test]
    fn test_logout_clears_token_and_user() {
        let storage = MemoryStorage::shared();
        let store = AuthStore::new(storage.clone());
        store.login(user(), "jwt".to_string());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);

        let restored = AuthStore::new(storage);
        assert!(restored.user().is_none());
    }

    #[test]
    fn test_user_without_token_is_dropped() {
        let storage = MemoryStorage::shared();
        AuthStore::new(storage.clone()).login(user(), "jwt".to_string());
        storage.remove_item(AUTH_TOKEN_KEY).unwrap();

        let restored = AuthStore::new(storage);
        assert!(!restored.is_authenticated());
        assert!(restored.user().is_none());
    }
}
