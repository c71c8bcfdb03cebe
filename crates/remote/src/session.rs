//! Authentication token storage.

use std::sync::{Arc, RwLock};

/// Holds the bearer token for the current session.
///
/// Presence of a token is the authentication signal the engine reads; the
/// HTTP client attaches the token to every request and clears it when the
/// service rejects it.
pub trait TokenStore: Send + Sync {
    /// Returns the current token, if any.
    fn token(&self) -> Option<String>;

    /// Stores a token (login).
    fn set_token(&self, token: String);

    /// Discards the token (logout or rejection).
    fn clear(&self);

    /// Returns true if a token is present.
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// In-memory token store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl InMemoryTokenStore {
    /// Creates an empty (unauthenticated) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write().unwrap() = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let store = InMemoryTokenStore::new();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn set_and_clear_token() {
        let store = InMemoryTokenStore::new();
        store.set_token("tok-123".to_string());
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));

        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn with_token_is_authenticated() {
        let store = InMemoryTokenStore::with_token("tok-9");
        assert!(store.is_authenticated());
    }
}
