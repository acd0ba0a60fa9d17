//! Policy resolution
//!
//! Two-stage lookup for a policy identifier:
//!
//! 1. Identifiers using the reserved prefix are synthesized by decoding them,
//!    and the result is cached.
//! 2. Everything else goes to the static registry untouched.
//!
//! A malformed identifier is never cached: every call re-attempts the decode
//! and fails the same way.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::{CacheStats, PolicyCache, DEFAULT_CACHE_CAPACITY};
use crate::error::Result;
use crate::policy::{codec, StaticPolicyRegistry};
use crate::types::PermissionRequirement;

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Built from the identifier itself (fresh decode or cache hit)
    Synthesized(Arc<PermissionRequirement>),
    /// Found in the static registry
    Static(Arc<PermissionRequirement>),
    /// Not owned by the naming convention and not registered
    NotFound,
}

impl Resolution {
    /// The resolved requirement, if any
    pub fn requirement(&self) -> Option<&Arc<PermissionRequirement>> {
        match self {
            Self::Synthesized(req) | Self::Static(req) => Some(req),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Resolves policy identifiers into requirements
///
/// # Thread Safety
///
/// Safe to share across threads behind an `Arc`. Two threads resolving the
/// same new identifier may both decode it; both write an equal value, so the
/// race costs only redundant work.
pub struct PolicyResolver {
    /// Requirements synthesized from the naming convention
    cache: PolicyCache,

    /// Fallback for non-convention identifiers
    fallback: StaticPolicyRegistry,

    /// Resolution statistics
    stats: DashMap<&'static str, usize>,
}

impl PolicyResolver {
    /// Create a resolver with an empty static registry
    pub fn new() -> Self {
        Self::with_registry(StaticPolicyRegistry::new())
    }

    /// Create a resolver with the given fallback registry
    pub fn with_registry(fallback: StaticPolicyRegistry) -> Self {
        Self::with_settings(fallback, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a resolver with a custom cache capacity
    pub fn with_settings(fallback: StaticPolicyRegistry, cache_capacity: usize) -> Self {
        Self {
            cache: PolicyCache::new(cache_capacity),
            fallback,
            stats: DashMap::new(),
        }
    }

    /// Resolve an identifier
    ///
    /// Returns `Err(MalformedPolicyIdentifier)` only for identifiers that
    /// carry the reserved prefix but do not decode.
    pub fn resolve(&self, identifier: &str) -> Result<Resolution> {
        if codec::is_permission_policy(identifier) {
            if let Some(requirement) = self.cache.get(identifier) {
                debug!("Policy cache hit: {}", identifier);
                return Ok(Resolution::Synthesized(requirement));
            }

            let requirement = match codec::decode(identifier) {
                Ok(requirement) => Arc::new(requirement),
                Err(e) => {
                    warn!("Rejecting policy identifier: {}", e);
                    self.increment_stat("malformed");
                    return Err(e);
                }
            };

            self.increment_stat("synthesized");
            if self.cache.insert(identifier, Arc::clone(&requirement)) {
                debug!("Synthesized and cached policy {} => {}", identifier, requirement);
            } else {
                debug!("Synthesized policy {} (cache full, not cached)", identifier);
            }

            return Ok(Resolution::Synthesized(requirement));
        }

        match self.fallback.get(identifier) {
            Some(requirement) => {
                debug!("Static policy '{}' => {}", identifier, requirement);
                self.increment_stat("static");
                Ok(Resolution::Static(requirement))
            }
            None => {
                warn!("Policy '{}' not found", identifier);
                self.increment_stat("not_found");
                Ok(Resolution::NotFound)
            }
        }
    }

    /// The fallback registry
    pub fn registry(&self) -> &StaticPolicyRegistry {
        &self.fallback
    }

    /// Number of cached synthesized requirements
    pub fn cached_policies(&self) -> usize {
        self.cache.len()
    }

    /// Get resolution statistics
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            cache: self.cache.stats(),
            synthesized: self.get_stat("synthesized"),
            static_hits: self.get_stat("static"),
            malformed: self.get_stat("malformed"),
            not_found: self.get_stat("not_found"),
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

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolution statistics
#[derive(Debug, Clone, Default)]
pub struct ResolverStats {
    /// Synthesized-policy cache statistics
    pub cache: CacheStats,
    /// Successful decodes (cache misses that produced a requirement)
    pub synthesized: usize,
    /// Lookups answered by the static registry
    pub static_hits: usize,
    /// Identifiers with the reserved prefix that failed to decode
    pub malformed: usize,
    /// Identifiers found nowhere
    pub not_found: usize,
}
