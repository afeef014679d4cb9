//! Time-boxed GET response cache.
//!
//! Keyed by absolute URL, holding the parsed JSON body. A zero TTL disables
//! the cache entirely (local development runs uncached). Mutable
//! authenticated resources never consult this cache — see
//! [`Freshness`](crate::api::Freshness) — so eviction calls are only needed
//! for catalog mutations.

use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use rustc_hash::FxHashMap;
use serde_json::Value;

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// Process-wide cache of successful GET bodies.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<FxHashMap<String, CacheEntry>>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// A fresh copy of the cached body for `url`, if present and unexpired.
    /// Expired entries are dropped on access.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Value> {
        if self.ttl.is_zero() {
            return None;
        }

        let mut entries = self.lock_entries();

        match entries.get(url) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(url);
                None
            }
            None => None,
        }
    }

    /// Store the body served for `url`.
    pub fn put(&self, url: String, value: Value) {
        if self.ttl.is_zero() {
            return;
        }

        self.lock_entries().insert(
            url,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `url`, if any.
    pub fn invalidate(&self, url: &str) {
        self.lock_entries().remove(url);
    }

    /// Drop every entry whose URL starts with `prefix`. Used by catalog
    /// mutations to evict both the collection and item entries they touch.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.lock_entries().retain(|url, _| !url.starts_with(prefix));
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
