//! Authorization outcome types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Message used in denial payloads
pub const MISSING_SCOPES_ERROR: &str = "Missing required scopes";

/// Allow or deny
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Effect {
    Allow,
    Deny,
}

/// Why the gate reached its decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeReason {
    /// Every declared requirement was met
    Satisfied,
    /// A requirement was evaluated and not met
    MissingPermissions,
    /// A declared identifier uses the reserved prefix but does not decode
    MalformedPolicyIdentifier,
    /// A declared identifier resolved to nothing
    PolicyResolutionFailed,
    /// The caller is not authenticated
    NotAuthenticated,
    /// No policies are registered for the requested endpoint
    UnknownEndpoint,
}

/// Result of an authorization check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Unique outcome identifier
    pub id: String,

    /// Whether the call may proceed
    pub effect: Effect,

    /// Reason for the decision
    pub reason: OutcomeReason,

    /// Policy that decided a denial, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,

    /// Permissions the caller lacks (denials only, when enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_permissions: Option<Vec<String>>,

    /// Decision timestamp (milliseconds since epoch)
    pub timestamp: i64,
}

impl Outcome {
    fn new(effect: Effect, reason: OutcomeReason, policy_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            effect,
            reason,
            policy_id,
            missing_permissions: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Allow decision
    pub fn allow() -> Self {
        Self::new(Effect::Allow, OutcomeReason::Satisfied, None)
    }

    /// Deny decision
    pub fn deny(reason: OutcomeReason, policy_id: Option<String>) -> Self {
        Self::new(Effect::Deny, reason, policy_id)
    }

    /// Attach the permissions the caller lacks
    pub fn with_missing_permissions(mut self, missing: Vec<String>) -> Self {
        self.missing_permissions = Some(missing);
        self
    }

    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }

    /// Suggested HTTP status for the host
    pub fn status_code(&self) -> u16 {
        match (self.effect, self.reason) {
            (Effect::Allow, _) => 200,
            (Effect::Deny, OutcomeReason::NotAuthenticated) => 401,
            (Effect::Deny, _) => 403,
        }
    }

    /// Structured body for a denial that carries missing permissions
    pub fn denial_payload(&self) -> Option<DenialPayload> {
        if self.effect != Effect::Deny {
            return None;
        }

        self.missing_permissions.as_ref().map(|scopes| DenialPayload {
            error: MISSING_SCOPES_ERROR.to_string(),
            scopes: scopes.clone(),
        })
    }
}

/// Denial body a host may send to the caller
///
/// Only lists permission names from the endpoint's own declaration, never
/// claim values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialPayload {
    pub error: String,
    pub scopes: Vec<String>,
}

impl DenialPayload {
    /// Serialize as a JSON body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
