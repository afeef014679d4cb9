//! Bearer credential store.
//!
//! The backend identifies the current user by an opaque bearer token. The
//! browser client keeps it in a cookie named `Bearer`; these stores are the
//! cookie-jar equivalent. Absence of a token is the normal logged-out state,
//! not an error.

use std::sync::{Arc, RwLock, PoisonError};

use mockall::automock;
use zeroize::Zeroize;

use crate::storage::Storage;

/// Storage key used by [`StoredCredentialStore`].
pub const BEARER_KEY: &str = "bearer";

/// Holder of the opaque bearer token identifying the current user.
#[automock]
pub trait CredentialStore: Send + Sync {
    /// The current token, or `None` when logged out.
    fn token(&self) -> Option<String>;

    /// Replace the stored token.
    fn store(&self, token: &str);

    /// Discard the stored token. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// In-memory credential store. Token material is zeroized on clear.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a store that already holds a token.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.store(token);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, token: &str) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(mut previous) = guard.replace(token.to_string()) {
            previous.zeroize();
        }
    }

    fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(mut previous) = guard.take() {
            previous.zeroize();
        }
    }
}

/// Credential store persisted through [`Storage`], so a login survives
/// process restarts the way the browser cookie does.
pub struct StoredCredentialStore {
    storage: Arc<dyn Storage>,
}

impl StoredCredentialStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl std::fmt::Debug for StoredCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore for StoredCredentialStore {
    fn token(&self) -> Option<String> {
        self.storage
            .read(BEARER_KEY)
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) {
        self.storage.write(BEARER_KEY, token);
    }

    fn clear(&self) {
        self.storage.remove(BEARER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::MemoryStorage;

    use super::*;

    #[test]
    fn memory_store_round_trips_token() {
        let store = MemoryCredentialStore::new();

        assert_eq!(store.token(), None);

        store.store("abc123");
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.clear();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn clearing_empty_store_is_noop() {
        let store = MemoryCredentialStore::new();

        store.clear();

        assert_eq!(store.token(), None);
    }

    #[test]
    fn stored_store_persists_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = StoredCredentialStore::new(storage.clone());

        store.store("tok_1");
        assert_eq!(storage.read(BEARER_KEY).as_deref(), Some("tok_1"));

        // A second store over the same storage sees the token.
        let other = StoredCredentialStore::new(storage);
        assert_eq!(other.token().as_deref(), Some("tok_1"));

        store.clear();
        assert_eq!(other.token(), None);
    }
}
