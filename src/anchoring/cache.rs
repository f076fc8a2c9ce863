//! Memoized anchoring with LRU eviction
//!
//! Entries are keyed on the content fingerprint of the root as well as the
//! selectors, so any change to the document text misses the cache.
//!
//! # Thread Safety
//!
//! The LRU sits behind a `parking_lot::Mutex`. The lock is never held while
//! anchoring; two threads missing on the same key both compute the result.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use super::engine::{anchor_selectors, AnchorOptions, AnchorResult};
use crate::document::AnchorRoot;
use crate::selectors::{TextPositionSelector, TextQuoteSelector};

/// Capacity used when zero is requested
pub const DEFAULT_ANCHOR_CACHE_SIZE: usize = 1024;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct AnchorCacheKey {
    fingerprint: u64,
    text_len: usize,
    quote: Option<TextQuoteSelector>,
    position: Option<TextPositionSelector>,
    options: AnchorOptions,
}

/// LRU cache in front of [`anchor_selectors`]
pub struct AnchorCache {
    entries: Mutex<LruCache<AnchorCacheKey, AnchorResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for AnchorCache {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_CACHE_SIZE)
    }
}

impl AnchorCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_ANCHOR_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Anchor through the cache
    pub fn anchor<R: AnchorRoot + ?Sized>(
        &self,
        root: &R,
        quote: Option<&TextQuoteSelector>,
        position: Option<&TextPositionSelector>,
        options: AnchorOptions,
    ) -> AnchorResult {
        let index = root.text_index();
        let key = AnchorCacheKey {
            fingerprint: index.fingerprint(),
            text_len: index.len(),
            quote: quote.cloned(),
            position: position.copied(),
            options,
        };

        if let Some(hit) = self.entries.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = anchor_selectors(root, quote, position, options);
        self.entries.lock().put(key, result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop all entries and reset counters
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> AnchorCacheStats {
        let entries = self.entries.lock();
        AnchorCacheStats {
            entries: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorCacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
