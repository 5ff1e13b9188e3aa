//! TTL cache implementation
//!
//! Readers share a read lock so concurrent cache hits never block each other.
//! Time is taken from `tokio::time::Instant`, which lets tests drive expiry
//! with a paused clock.

use crate::fetcher::Document;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// A cached document and the instant it stops being served
#[derive(Debug, Clone)]
struct CacheEntry {
    document: Document,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent document cache with per-entry expiry
#[derive(Debug, Default)]
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached document if present and not yet expired
    ///
    /// An entry whose expiry has been reached is treated as absent but is
    /// left in storage.
    pub fn get(&self, key: &str) -> Option<Document> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;

        if entry.is_expired(Instant::now()) {
            return None;
        }

        Some(entry.document.clone())
    }

    /// Inserts or overwrites a document, expiring `ttl` from now
    pub fn set(&self, key: &str, document: Document, ttl: Duration) {
        let entry = CacheEntry {
            document,
            expires_at: Instant::now() + ttl,
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), entry);
    }

    /// Removes every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        tracing::debug!("Document cache cleared");
    }

    /// Number of stored entries, expired ones included
    pub fn size(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops expired entries and returns how many were removed
    ///
    /// Never called implicitly; long-lived callers use this to bound growth.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}
