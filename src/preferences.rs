//! Persisted UI flags.
//!
//! Small pieces of UX continuity (whether the cart drawer or dashboard
//! sidebar was open) survive reloads under their own storage keys. Unlike
//! favorites these are plain booleans; unparseable values fall back to the
//! defaults.

use std::sync::Arc;

use crate::storage::Storage;

/// Storage key for the cart drawer flag.
pub const CART_OPEN_KEY: &str = "cart_open";

/// Storage key for the dashboard sidebar flag.
pub const SIDEBAR_OPEN_KEY: &str = "sidebar_open";

/// Reader/writer for the persisted UI flags.
pub struct PreferencesStore {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for PreferencesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesStore").finish_non_exhaustive()
    }
}

impl PreferencesStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Whether the cart drawer was open. Defaults to closed.
    #[must_use]
    pub fn cart_open(&self) -> bool {
        self.read_flag(CART_OPEN_KEY, false)
    }

    pub fn set_cart_open(&self, open: bool) {
        self.write_flag(CART_OPEN_KEY, open);
    }

    /// Whether the dashboard sidebar was open. Defaults to open.
    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.read_flag(SIDEBAR_OPEN_KEY, true)
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.write_flag(SIDEBAR_OPEN_KEY, open);
    }

    fn read_flag(&self, key: &str, default: bool) -> bool {
        self.storage
            .read(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(default)
    }

    fn write_flag(&self, key: &str, value: bool) {
        self.storage.write(key, if value { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::MemoryStorage;

    use super::*;

    #[test]
    fn flags_default_until_written() {
        let prefs = PreferencesStore::new(Arc::new(MemoryStorage::new()));

        assert!(!prefs.cart_open(), "cart drawer defaults closed");
        assert!(prefs.sidebar_open(), "sidebar defaults open");
    }

    #[test]
    fn flags_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        let prefs = PreferencesStore::new(storage.clone());

        prefs.set_cart_open(true);
        prefs.set_sidebar_open(false);

        let reloaded = PreferencesStore::new(storage);
        assert!(reloaded.cart_open(), "cart flag should persist");
        assert!(!reloaded.sidebar_open(), "sidebar flag should persist");
    }

    #[test]
    fn unparseable_flag_falls_back_to_default() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(CART_OPEN_KEY, "maybe");

        let prefs = PreferencesStore::new(storage);

        assert!(!prefs.cart_open(), "corrupt flag should read as default");
    }
}
