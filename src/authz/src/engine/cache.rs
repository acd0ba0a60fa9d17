//! Synthesized policy cache
//!
//! Write-once-per-key map from policy identifier to decoded requirement.
//! Entries never expire: a requirement is a pure function of its identifier,
//! so a cached value is always the value a fresh decode would produce.

use dashmap::DashMap;
use std::sync::Arc;

use crate::types::{PermissionRequirement, PolicyId};

/// Default maximum number of cached requirements
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Concurrent cache of decoded requirements
///
/// Provides:
/// - Lock-free concurrent reads and inserts via DashMap
/// - A soft capacity: once reached, new keys are not inserted and callers
///   keep working from freshly decoded values
/// - Hit/miss statistics
pub struct PolicyCache {
    /// Decoded requirements keyed by identifier
    entries: DashMap<PolicyId, Arc<PermissionRequirement>>,

    /// Maximum number of entries
    capacity: usize,

    /// Cache statistics
    stats: DashMap<&'static str, usize>,
}

impl PolicyCache {
    /// Create a cache holding at most `capacity` requirements
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            stats: DashMap::new(),
        }
    }

    /// Get a cached requirement
    pub fn get(&self, identifier: &str) -> Option<Arc<PermissionRequirement>> {
        match self.entries.get(identifier) {
            Some(entry) => {
                self.increment_stat("hits");
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.increment_stat("misses");
                None
            }
        }
    }

    /// Store a requirement, returning false if the cache is full
    ///
    /// Concurrent first inserts of the same key are harmless: every writer
    /// holds an equal value and the last one wins. The capacity check is not
    /// atomic with the insert, so a burst of writers may overshoot it by a
    /// few entries.
    pub fn insert(&self, identifier: &str, requirement: Arc<PermissionRequirement>) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(identifier) {
            self.increment_stat("rejected");
            return false;
        }

        self.entries.insert(identifier.to_string(), requirement);
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            rejected: self.get_stat("rejected"),
            entries: self.entries.len(),
            capacity: self.capacity,
        }
    }

    fn increment_stat(&self, key: &'static str) {
        self.stats
            .entry(key)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

impl Default for PolicyCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Inserts skipped because the cache was full
    pub rejected: usize,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
