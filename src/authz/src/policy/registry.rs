//! Statically declared policies
//!
//! The fallback for any identifier that does not use the reserved naming
//! convention. Entries are registered at startup and read-only afterwards.

use super::codec::is_permission_policy;
use crate::error::{AuthzError, Result};
use crate::types::{PermissionRequirement, PolicyId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Name → requirement table for policies configured outside the naming convention
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyRegistry {
    policies: HashMap<PolicyId, Arc<PermissionRequirement>>,
}

impl StaticPolicyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named policy, replacing any previous entry with that name
    ///
    /// Names using the reserved prefix are rejected: the resolver never
    /// consults the registry for them, so such an entry could never match.
    pub fn register(
        &mut self,
        name: impl Into<PolicyId>,
        requirement: PermissionRequirement,
    ) -> Result<Option<Arc<PermissionRequirement>>> {
        let name = name.into();

        if name.is_empty() {
            return Err(AuthzError::InvalidPolicy(
                "Static policy name cannot be empty".to_string(),
            ));
        }

        if is_permission_policy(&name) {
            return Err(AuthzError::InvalidPolicy(format!(
                "Static policy '{}' uses the reserved permission prefix",
                name
            )));
        }

        if requirement.permissions().is_empty() {
            return Err(AuthzError::InvalidPolicy(format!(
                "Static policy '{}' names no permissions",
                name
            )));
        }

        debug!("Registering static policy '{}': {}", name, requirement);
        Ok(self.policies.insert(name, Arc::new(requirement)))
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_policy(
        mut self,
        name: impl Into<PolicyId>,
        requirement: PermissionRequirement,
    ) -> Result<Self> {
        self.register(name, requirement)?;
        Ok(self)
    }

    /// Look up a policy by name
    pub fn get(&self, name: &str) -> Option<Arc<PermissionRequirement>> {
        self.policies.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Registered policy names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
