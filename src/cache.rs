//! Time-boxed memoization for reference results.
//!
//! [`TtlCache`] is the one generic cache shared by the directory index, the
//! reference resolvers and anything else that memoizes by key. An entry is a
//! hit only while `now - computed_at < ttl`; expired entries are dropped on
//! lookup.
//!
//! # Thread Safety
//!
//! **This cache is NOT thread-safe.** All mutation happens from the
//! single cooperative task that owns the [`crate::LensProvider`]. Do not
//! assume atomicity across an `.await` between a `get` miss and the `put`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::InvalidationPolicy;
use crate::kind::DocumentKind;
use crate::project::CONFIG_FILE_NAMES;
use crate::resolve::ReferenceLocation;

/// Cache statistics for monitoring effectiveness
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

impl CacheStats {
    /// Calculate cache hit rate as a fraction (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Entry<V> {
    value: V,
    computed_at: Instant,
}

/// Key/value cache whose entries expire after a fixed TTL.
pub struct TtlCache<K, V> {
    ttl: Duration,
    map: HashMap<K, Entry<V>>,
    hits: usize,
    misses: usize,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            map: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh value by key.
    ///
    /// An expired entry counts as a miss and is removed.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let fresh = match self.map.get(key) {
            Some(entry) => entry.computed_at.elapsed() < self.ttl,
            None => {
                self.misses += 1;
                return None;
            }
        };

        if fresh {
            self.hits += 1;
            self.map.get(key).map(|entry| entry.value.clone())
        } else {
            self.map.remove(key);
            self.misses += 1;
            None
        }
    }

    /// Insert or fully replace the entry for `key`.
    pub fn put(&mut self, key: K, value: V) {
        self.map.insert(
            key,
            Entry {
                value,
                computed_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&mut self, key: &K) {
        self.map.remove(key);
    }

    /// Drop every entry. Hit/miss counters are kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of stored entries, including ones that have expired but were
    /// not looked up since.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.map.len(),
        }
    }
}

/// Composite reference-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Requesting document
    pub document: PathBuf,
    /// Symbol name
    pub symbol: String,
    /// Which declaration pattern produced the request
    pub context: String,
}

impl CacheKey {
    pub fn new(document: &Path, symbol: &str, context: &str) -> Self {
        Self {
            document: document.to_path_buf(),
            symbol: symbol.to_string(),
            context: context.to_string(),
        }
    }
}

/// Shared, immutable reference list. Cache hits hand out the same
/// allocation.
pub type Locations = Arc<[ReferenceLocation]>;

/// One [`TtlCache`] per document kind, invalidated by file-change events.
pub struct ReferenceCache {
    caches: BTreeMap<DocumentKind, TtlCache<CacheKey, Locations>>,
    policy: InvalidationPolicy,
}

impl ReferenceCache {
    pub fn new(ttl: Duration, policy: InvalidationPolicy) -> Self {
        let caches = DocumentKind::ALL
            .into_iter()
            .map(|kind| (kind, TtlCache::new(ttl)))
            .collect();
        Self { caches, policy }
    }

    pub fn get(&mut self, kind: DocumentKind, key: &CacheKey) -> Option<Locations> {
        self.caches.get_mut(&kind).and_then(|cache| cache.get(key))
    }

    pub fn put(&mut self, kind: DocumentKind, key: CacheKey, locations: Locations) {
        if let Some(cache) = self.caches.get_mut(&kind) {
            cache.put(key, locations);
        }
    }

    pub fn invalidate(&mut self, kind: DocumentKind, key: &CacheKey) {
        if let Some(cache) = self.caches.get_mut(&kind) {
            cache.invalidate(key);
        }
    }

    pub fn invalidate_all(&mut self) {
        for cache in self.caches.values_mut() {
            cache.clear();
        }
    }

    /// Kinds whose reference results could change when `path` changes.
    ///
    /// A path without an extension may be a directory, so it touches every
    /// kind.
    pub fn affected_kinds(path: &Path) -> Vec<DocumentKind> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return DocumentKind::ALL.to_vec();
        };
        let is_config = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| CONFIG_FILE_NAMES.contains(&n))
            .unwrap_or(false);

        DocumentKind::ALL
            .into_iter()
            .filter(|kind| {
                kind.usage_extension(ext)
                    || (is_config && matches!(kind, DocumentKind::Middleware | DocumentKind::Layout))
            })
            .collect()
    }

    /// Apply the invalidation policy for one changed path.
    ///
    /// Returns the kinds whose caches were cleared.
    pub fn invalidate_for_change(&mut self, path: &Path) -> Vec<DocumentKind> {
        let affected = Self::affected_kinds(path);
        if affected.is_empty() {
            return affected;
        }

        match self.policy {
            InvalidationPolicy::ClearAll => {
                self.invalidate_all();
                DocumentKind::ALL.to_vec()
            }
            InvalidationPolicy::ByKind => {
                for kind in &affected {
                    if let Some(cache) = self.caches.get_mut(kind) {
                        cache.clear();
                    }
                }
                affected
            }
        }
    }

    pub fn stats(&self, kind: DocumentKind) -> CacheStats {
        self.caches
            .get(&kind)
            .map(|cache| cache.stats())
            .unwrap_or_default()
    }
}
