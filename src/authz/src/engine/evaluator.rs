//! Requirement evaluation against caller claims

use super::decision::Effect;
use crate::claims::{ClaimLookup, PERMISSIONS_CLAIM_TYPE};
use crate::types::{PermissionOperator, PermissionRequirement};

/// Evaluates requirements against a claim store
///
/// Stateless apart from the claim type it reads, so one instance can be
/// shared by any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct RequirementEvaluator {
    claim_type: String,
}

impl RequirementEvaluator {
    /// Evaluator reading the given claim type
    pub fn new(claim_type: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
        }
    }

    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    /// Decide a requirement
    ///
    /// AND stops at the first absent permission, OR at the first present one.
    /// Permissions are checked in declaration order.
    pub fn evaluate<C>(&self, requirement: &PermissionRequirement, claims: &C) -> Effect
    where
        C: ClaimLookup + ?Sized,
    {
        match requirement.operator() {
            PermissionOperator::And => {
                for permission in requirement.permissions() {
                    if !claims.has_claim(&self.claim_type, permission) {
                        return Effect::Deny;
                    }
                }
                Effect::Allow
            }
            PermissionOperator::Or => {
                for permission in requirement.permissions() {
                    if claims.has_claim(&self.claim_type, permission) {
                        return Effect::Allow;
                    }
                }
                Effect::Deny
            }
        }
    }

    /// Permissions to report for a denied requirement
    ///
    /// For AND, every absent permission (checked exhaustively, unlike
    /// [`evaluate`](Self::evaluate)). For OR, none matched, so the whole list.
    /// Duplicates are reported once, in declaration order.
    pub fn missing_permissions<C>(&self, requirement: &PermissionRequirement, claims: &C) -> Vec<String>
    where
        C: ClaimLookup + ?Sized,
    {
        let mut missing: Vec<String> = Vec::new();

        for permission in requirement.permissions() {
            if missing.contains(permission) {
                continue;
            }
            let report = match requirement.operator() {
                PermissionOperator::And => !claims.has_claim(&self.claim_type, permission),
                PermissionOperator::Or => true,
            };
            if report {
                missing.push(permission.clone());
            }
        }

        missing
    }
}

impl Default for RequirementEvaluator {
    fn default() -> Self {
        Self::new(PERMISSIONS_CLAIM_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimSet;

    fn and(perms: &[&str]) -> PermissionRequirement {
        PermissionRequirement::new(PermissionOperator::And, perms.to_vec()).unwrap()
    }

    fn or(perms: &[&str]) -> PermissionRequirement {
        PermissionRequirement::new(PermissionOperator::Or, perms.to_vec()).unwrap()
    }

    #[test]
    fn test_and_requires_all() {
        let evaluator = RequirementEvaluator::default();
        let claims = ClaimSet::with_permissions(["a", "b"]);

        assert_eq!(evaluator.evaluate(&and(&["a", "b"]), &claims), Effect::Allow);
        assert_eq!(evaluator.evaluate(&and(&["a", "b", "c"]), &claims), Effect::Deny);
    }

    #[test]
    fn test_or_requires_any() {
        let evaluator = RequirementEvaluator::default();
        let claims = ClaimSet::with_permissions(["b"]);

        assert_eq!(evaluator.evaluate(&or(&["a", "b"]), &claims), Effect::Allow);
        assert_eq!(evaluator.evaluate(&or(&["a", "c"]), &claims), Effect::Deny);
    }

    #[test]
    fn test_custom_claim_type() {
        let evaluator = RequirementEvaluator::new("scope");
        let claims = ClaimSet::authenticated().with_claim("scope", "a");

        assert_eq!(evaluator.claim_type(), "scope");
        assert_eq!(evaluator.evaluate(&and(&["a"]), &claims), Effect::Allow);
        assert_eq!(
            RequirementEvaluator::default().evaluate(&and(&["a"]), &claims),
            Effect::Deny
        );
    }

    #[test]
    fn test_missing_permissions() {
        let evaluator = RequirementEvaluator::default();
        let claims = ClaimSet::with_permissions(["b"]);

        assert_eq!(
            evaluator.missing_permissions(&and(&["a", "b", "c", "a"]), &claims),
            vec!["a", "c"]
        );
        assert_eq!(
            evaluator.missing_permissions(&or(&["x", "y"]), &claims),
            vec!["x", "y"]
        );
    }
}
