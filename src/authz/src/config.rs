//! Gate configuration
//!
//! Loaded from JSON (string or file) or from environment variables:
//!
//! - `AUTHZ_CLAIM_TYPE` - claim type holding permissions (default: permissions)
//! - `AUTHZ_REQUIRE_AUTHENTICATED` - deny anonymous callers (default: true)
//! - `AUTHZ_ATTACH_DENIAL_PAYLOAD` - report missing permissions (default: true)
//! - `AUTHZ_MAX_CACHED_POLICIES` - synthesized policy cache capacity (default: 10000)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::claims::PERMISSIONS_CLAIM_TYPE;
use crate::engine::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::{AuthzError, Result};
use crate::policy::{is_permission_policy, StaticPolicyRegistry};
use crate::types::{PermissionOperator, PermissionRequirement};

/// A statically declared policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPolicyConfig {
    pub operator: PermissionOperator,
    pub permissions: Vec<String>,
}

/// Authorization gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Claim type the evaluator reads
    pub claim_type: String,

    /// Deny callers whose claims are not marked authenticated
    pub require_authenticated: bool,

    /// Report missing permissions on denials
    pub attach_denial_payload: bool,

    /// Capacity of the synthesized policy cache
    pub max_cached_policies: usize,

    /// Fallback policies by name
    pub static_policies: BTreeMap<String, StaticPolicyConfig>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            claim_type: PERMISSIONS_CLAIM_TYPE.to_string(),
            require_authenticated: true,
            attach_denial_payload: true,
            max_cached_policies: DEFAULT_CACHE_CAPACITY,
            static_policies: BTreeMap::new(),
        }
    }
}

impl GateConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Defaults overridden by `AUTHZ_*` environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            claim_type: std::env::var("AUTHZ_CLAIM_TYPE").unwrap_or(defaults.claim_type),
            require_authenticated: env_or("AUTHZ_REQUIRE_AUTHENTICATED", defaults.require_authenticated),
            attach_denial_payload: env_or("AUTHZ_ATTACH_DENIAL_PAYLOAD", defaults.attach_denial_payload),
            max_cached_policies: env_or("AUTHZ_MAX_CACHED_POLICIES", defaults.max_cached_policies),
            static_policies: defaults.static_policies,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for mistakes that would make policies unreachable
    pub fn validate(&self) -> Result<()> {
        if self.claim_type.is_empty() {
            return Err(AuthzError::Config("claim_type cannot be empty".to_string()));
        }

        for (name, policy) in &self.static_policies {
            if is_permission_policy(name) {
                return Err(AuthzError::Config(format!(
                    "static policy '{}' uses the reserved permission prefix",
                    name
                )));
            }
            if policy.permissions.is_empty() {
                return Err(AuthzError::Config(format!(
                    "static policy '{}' has no permissions",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Build the fallback registry from `static_policies`
    pub fn build_registry(&self) -> Result<StaticPolicyRegistry> {
        let mut registry = StaticPolicyRegistry::new();

        for (name, policy) in &self.static_policies {
            let requirement =
                PermissionRequirement::new(policy.operator, policy.permissions.iter().cloned())?;
            registry.register(name.clone(), requirement)?;
        }

        Ok(registry)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value for {}: {}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
