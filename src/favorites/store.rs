//! Favorites store.
//!
//! A deduplicated wishlist of product snapshots. Purely local state: no
//! backend call is ever made for it. The whole collection is serialized to
//! durable storage on every change and read back once at startup; corrupt
//! stored data means "no favorites", never a startup failure.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::{catalog::models::Product, storage::Storage};

/// Storage key holding the serialized favorites collection.
pub const FAVORITES_KEY: &str = "favorites";

/// Deduplicated, locally persisted wishlist.
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    favorites: RwLock<Vec<Product>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("len", &self.read_favorites().len())
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Load the persisted favorites from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let favorites = match storage.read(FAVORITES_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(favorites) => favorites,
                Err(error) => {
                    warn!("discarding unreadable favorites: {error}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            storage,
            favorites: RwLock::new(favorites),
        }
    }

    /// The favorited products, in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> Vec<Product> {
        self.read_favorites().clone()
    }

    /// Whether the product is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, product_id: u64) -> bool {
        self.read_favorites()
            .iter()
            .any(|product| product.id == product_id)
    }

    /// Add a product. Adding one that is already present is a no-op.
    pub fn add(&self, product: Product) {
        let mut favorites = self.write_favorites();

        if favorites.iter().any(|existing| existing.id == product.id) {
            return;
        }

        favorites.push(product);
        self.persist(&favorites);
    }

    /// Remove a product by id. Removing an absent id is a no-op.
    pub fn remove(&self, product_id: u64) {
        let mut favorites = self.write_favorites();

        let before = favorites.len();
        favorites.retain(|product| product.id != product_id);

        if favorites.len() != before {
            self.persist(&favorites);
        }
    }

    /// Empty the wishlist.
    pub fn clear(&self) {
        let mut favorites = self.write_favorites();

        favorites.clear();
        self.persist(&favorites);
    }

    fn persist(&self, favorites: &[Product]) {
        match serde_json::to_string(favorites) {
            Ok(serialized) => self.storage.write(FAVORITES_KEY, &serialized),
            Err(error) => warn!("failed to serialize favorites: {error}"),
        }
    }

    fn read_favorites(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.favorites.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_favorites(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
