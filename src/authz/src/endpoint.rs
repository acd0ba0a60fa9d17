//! Endpoint policy declarations
//!
//! Each route carries the policy identifiers it requires as plain data,
//! registered alongside the handler and read by the gate at dispatch time.

use std::collections::HashMap;

use crate::error::Result;
use crate::policy::codec;
use crate::types::{PermissionOperator, PolicyId};

/// Policies an endpoint requires; all of them must be satisfied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPolicies {
    policies: Vec<PolicyId>,
}

impl EndpointPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a combination of permissions
    pub fn require<S: AsRef<str>>(mut self, operator: PermissionOperator, permissions: &[S]) -> Result<Self> {
        self.policies.push(codec::encode(operator, permissions)?);
        Ok(self)
    }

    /// Require a single permission
    pub fn require_permission(mut self, permission: &str) -> Result<Self> {
        self.policies.push(codec::encode_single(permission)?);
        Ok(self)
    }

    /// Require a policy by identifier (static name or pre-encoded identifier)
    pub fn require_policy(mut self, identifier: impl Into<PolicyId>) -> Self {
        self.policies.push(identifier.into());
        self
    }

    /// Declared identifiers in declaration order
    pub fn policies(&self) -> &[PolicyId] {
        &self.policies
    }
}

/// Route → declared policies
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, EndpointPolicies>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the policies for a route, replacing any earlier declaration
    pub fn register(&mut self, route: impl Into<String>, policies: EndpointPolicies) {
        self.endpoints.insert(route.into(), policies);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_endpoint(mut self, route: impl Into<String>, policies: EndpointPolicies) -> Self {
        self.register(route, policies);
        self
    }

    pub fn get(&self, route: &str) -> Option<&EndpointPolicies> {
        self.endpoints.get(route)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
