//! Core authorization types

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Policy identifier as declared on an endpoint (e.g. "PERMISSION_1_ride.book")
pub type PolicyId = String;

/// Permission name as carried in the caller's claims (e.g. "ride.view")
pub type PermissionId = String;

/// Combination rule for the permissions of a single requirement
///
/// The numeric value is part of the policy identifier wire format and must
/// not change: `0 = Or`, `1 = And`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionOperator {
    /// At least one permission must be present
    Or = 0,
    /// Every permission must be present
    And = 1,
}

impl PermissionOperator {
    /// Digit used for this operator in policy identifiers
    pub fn digit(self) -> u32 {
        self as u32
    }

    /// Operator for a wire digit, if known
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            0 => Some(Self::Or),
            1 => Some(Self::And),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Or => write!(f, "OR"),
            Self::And => write!(f, "AND"),
        }
    }
}

/// Structured, evaluable form of a permission policy
///
/// A requirement is always mandatory for the endpoint declaring it. It is
/// produced either by decoding a policy identifier or by static registration.
/// Deserialization goes through [`PermissionRequirement::new`], so a
/// requirement with no permissions can never be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequirementFields")]
pub struct PermissionRequirement {
    operator: PermissionOperator,
    permissions: Vec<PermissionId>,
}

/// Unvalidated wire shape of a requirement
#[derive(Deserialize)]
struct RequirementFields {
    operator: PermissionOperator,
    permissions: Vec<PermissionId>,
}

impl TryFrom<RequirementFields> for PermissionRequirement {
    type Error = AuthzError;

    fn try_from(fields: RequirementFields) -> Result<Self> {
        Self::new(fields.operator, fields.permissions)
    }
}

impl PermissionRequirement {
    /// Create a requirement, rejecting an empty permission list or empty names
    pub fn new<I, S>(operator: PermissionOperator, permissions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions: Vec<String> = permissions.into_iter().map(Into::into).collect();

        if permissions.is_empty() {
            return Err(AuthzError::InvalidPolicy(
                "Requirement must name at least one permission".to_string(),
            ));
        }

        if permissions.iter().any(|p| p.is_empty()) {
            return Err(AuthzError::InvalidPolicy(
                "Requirement contains an empty permission".to_string(),
            ));
        }

        Ok(Self {
            operator,
            permissions,
        })
    }

    /// Build from parts already known to be valid (decoder output)
    pub(crate) fn from_parts(operator: PermissionOperator, permissions: Vec<PermissionId>) -> Self {
        debug_assert!(!permissions.is_empty());
        Self {
            operator,
            permissions,
        }
    }

    /// How the permissions combine
    pub fn operator(&self) -> PermissionOperator {
        self.operator
    }

    /// Permissions in declaration order
    pub fn permissions(&self) -> &[PermissionId] {
        &self.permissions
    }

    /// Permissions as a set, ignoring order and duplicates
    pub fn permission_set(&self) -> BTreeSet<&str> {
        self.permissions.iter().map(String::as_str).collect()
    }

    /// Same operator and same permission set
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.operator == other.operator && self.permission_set() == other.permission_set()
    }

    /// Encode this requirement as a policy identifier
    pub fn policy_id(&self) -> Result<PolicyId> {
        crate::policy::codec::encode(self.operator, self.permissions.as_slice())
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joiner = match self.operator {
            PermissionOperator::And => " AND ",
            PermissionOperator::Or => " OR ",
        };
        write!(f, "{}", self.permissions.join(joiner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_digits() {
        assert_eq!(PermissionOperator::Or.digit(), 0);
        assert_eq!(PermissionOperator::And.digit(), 1);
        assert_eq!(PermissionOperator::from_digit(1), Some(PermissionOperator::And));
        assert_eq!(PermissionOperator::from_digit(0), Some(PermissionOperator::Or));
        assert_eq!(PermissionOperator::from_digit(2), None);
    }

    #[test]
    fn test_operator_serde() {
        let json = serde_json::to_string(&PermissionOperator::And).unwrap();
        assert_eq!(json, "\"AND\"");

        let op: PermissionOperator = serde_json::from_str("\"OR\"").unwrap();
        assert_eq!(op, PermissionOperator::Or);
    }

    #[test]
    fn test_requirement_rejects_empty() {
        let empty: Vec<String> = vec![];
        assert!(PermissionRequirement::new(PermissionOperator::And, empty).is_err());
        assert!(PermissionRequirement::new(PermissionOperator::Or, vec!["a", ""]).is_err());
    }

    #[test]
    fn test_requirement_deserialize_validates() {
        let req: PermissionRequirement =
            serde_json::from_str(r#"{"operator":"AND","permissions":["ride.book","ride.view"]}"#).unwrap();
        assert_eq!(req.operator(), PermissionOperator::And);
        assert_eq!(req.permissions(), &["ride.book", "ride.view"]);

        let empty = serde_json::from_str::<PermissionRequirement>(r#"{"operator":"AND","permissions":[]}"#);
        assert!(empty.is_err());

        let blank = serde_json::from_str::<PermissionRequirement>(r#"{"operator":"OR","permissions":["a",""]}"#);
        assert!(blank.is_err());
    }

    #[test]
    fn test_requirement_equivalence_ignores_order() {
        let a = PermissionRequirement::new(PermissionOperator::And, vec!["x", "y"]).unwrap();
        let b = PermissionRequirement::new(PermissionOperator::And, vec!["y", "x", "x"]).unwrap();
        let c = PermissionRequirement::new(PermissionOperator::Or, vec!["x", "y"]).unwrap();

        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_requirement_display() {
        let req = PermissionRequirement::new(PermissionOperator::Or, vec!["ride.view", "ride.book"]).unwrap();
        assert_eq!(req.to_string(), "ride.view OR ride.book");
    }
}
