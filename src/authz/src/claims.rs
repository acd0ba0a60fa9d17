//! Caller claims
//!
//! A [`ClaimSet`] is the already-authenticated evidence about a caller. The
//! engine only reads the designated permission claim type; populating it is
//! the job of the identity layer in front of the engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Claim type holding permission names
pub const PERMISSIONS_CLAIM_TYPE: &str = "permissions";

/// Claim type holding the subject identifier in a userinfo document
const SUBJECT_CLAIM: &str = "sub";

/// Presence test used by the evaluator
///
/// Implemented by [`ClaimSet`]; other claim stores (or instrumented test
/// doubles) can implement it to plug into [`RequirementEvaluator`].
///
/// [`RequirementEvaluator`]: crate::engine::RequirementEvaluator
pub trait ClaimLookup {
    /// True iff at least one claim of `claim_type` has exactly `value`
    fn has_claim(&self, claim_type: &str, value: &str) -> bool;
}

/// Multimap of claim type to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject the claims were issued for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Whether upstream authentication succeeded
    #[serde(default)]
    pub authenticated: bool,

    #[serde(default)]
    claims: HashMap<String, Vec<String>>,
}

impl ClaimSet {
    /// Empty claim set for an authenticated caller
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            ..Self::default()
        }
    }

    /// Empty claim set for an anonymous caller
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated claim set carrying the given permission claims
    pub fn with_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_claims(PERMISSIONS_CLAIM_TYPE, permissions)
    }

    /// Authenticated claim set carrying `values` under `claim_type`
    ///
    /// Use this with the gate's configured claim type when it is not the
    /// default `permissions`.
    pub fn with_claims<I, S>(claim_type: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut claims = Self::authenticated();
        for value in values {
            claims.add(claim_type, value);
        }
        claims
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a claim (builder form)
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(claim_type, value);
        self
    }

    /// Add a claim; duplicates are kept
    pub fn add(&mut self, claim_type: impl Into<String>, value: impl Into<String>) {
        self.claims
            .entry(claim_type.into())
            .or_default()
            .push(value.into());
    }

    /// All values of a claim type
    pub fn values(&self, claim_type: &str) -> &[String] {
        self.claims
            .get(claim_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of claims across all types
    pub fn len(&self) -> usize {
        self.claims.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build an authenticated claim set from a userinfo JSON document
    ///
    /// The `permissions` member may be an array of strings or a single
    /// string; each value becomes a permission claim. Other top-level
    /// scalar members are kept under their own key, and `sub` also sets the
    /// subject. Non-string permission entries are skipped.
    pub fn from_userinfo(document: &Value) -> Self {
        Self::from_userinfo_as(document, PERMISSIONS_CLAIM_TYPE)
    }

    /// Like [`from_userinfo`](Self::from_userinfo), but stores the
    /// document's permissions under `claim_type`
    pub fn from_userinfo_as(document: &Value, claim_type: &str) -> Self {
        let mut claims = Self::authenticated();

        let Some(object) = document.as_object() else {
            return claims;
        };

        for (key, value) in object {
            if key == PERMISSIONS_CLAIM_TYPE {
                match value {
                    Value::Array(items) => {
                        for item in items.iter().filter_map(Value::as_str) {
                            claims.add(claim_type, item);
                        }
                    }
                    Value::String(single) => claims.add(claim_type, single.as_str()),
                    _ => {}
                }
                continue;
            }

            match value {
                Value::String(s) => {
                    if key == SUBJECT_CLAIM {
                        claims.subject = Some(s.clone());
                    }
                    claims.add(key.as_str(), s.as_str());
                }
                Value::Bool(_) | Value::Number(_) => claims.add(key.as_str(), value.to_string()),
                _ => {}
            }
        }

        claims
    }
}

impl ClaimLookup for ClaimSet {
    fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.values(claim_type).iter().any(|v| v == value)
    }
}
