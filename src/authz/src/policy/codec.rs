//! Policy identifier encoding
//!
//! Wire format: `PERMISSION_<digit>_<perm1>_<perm2>_..._<permN>` where the
//! digit is the [`PermissionOperator`] value (`0 = OR`, `1 = AND`).
//! Declarations in the wild depend on this exact text, so the prefix, the
//! separator and the digit mapping are fixed.

use crate::error::{AuthzError, MalformedReason, Result};
use crate::types::{PermissionOperator, PermissionRequirement, PolicyId};

/// Reserved prefix marking identifiers owned by this engine
pub const POLICY_PREFIX: &str = "PERMISSION_";

/// Separator between the operator digit and each permission
pub const SEPARATOR: char = '_';

/// True if the identifier uses the reserved naming convention
pub fn is_permission_policy(identifier: &str) -> bool {
    identifier.starts_with(POLICY_PREFIX)
}

/// Encode an operator and permission list into a policy identifier
///
/// Permissions keep their order. Fails if the list is empty, or if any
/// permission is empty or contains the separator.
pub fn encode<S: AsRef<str>>(operator: PermissionOperator, permissions: &[S]) -> Result<PolicyId> {
    if permissions.is_empty() {
        return Err(AuthzError::InvalidPermission(
            "at least one permission is required".to_string(),
        ));
    }

    let mut identifier = format!("{}{}", POLICY_PREFIX, operator.digit());

    for permission in permissions {
        let permission = permission.as_ref();
        if permission.is_empty() {
            return Err(AuthzError::InvalidPermission(
                "permission name cannot be empty".to_string(),
            ));
        }
        if permission.contains(SEPARATOR) {
            return Err(AuthzError::InvalidPermission(format!(
                "permission '{}' contains the separator '{}'",
                permission, SEPARATOR
            )));
        }

        identifier.push(SEPARATOR);
        identifier.push_str(permission);
    }

    Ok(identifier)
}

/// Encode a single permission; a lone permission is always an AND requirement
pub fn encode_single(permission: &str) -> Result<PolicyId> {
    encode(PermissionOperator::And, &[permission])
}

/// Decode a policy identifier into a requirement
///
/// Empty segments produced by adjacent separators are dropped.
pub fn decode(identifier: &str) -> Result<PermissionRequirement> {
    let rest = identifier
        .strip_prefix(POLICY_PREFIX)
        .ok_or_else(|| AuthzError::malformed(identifier, MalformedReason::MissingPrefix))?;

    let mut chars = rest.chars();
    let digit = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| AuthzError::malformed(identifier, MalformedReason::MissingOperatorDigit))?;

    let operator = PermissionOperator::from_digit(digit).ok_or_else(|| {
        AuthzError::malformed(identifier, MalformedReason::UnknownOperatorDigit(digit))
    })?;

    let list = chars.as_str();
    if list.is_empty() {
        return Err(AuthzError::malformed(identifier, MalformedReason::NoPermissions));
    }

    let list = list
        .strip_prefix(SEPARATOR)
        .ok_or_else(|| AuthzError::malformed(identifier, MalformedReason::MissingSeparator))?;

    let permissions: Vec<String> = list
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if permissions.is_empty() {
        return Err(AuthzError::malformed(identifier, MalformedReason::NoPermissions));
    }

    Ok(PermissionRequirement::from_parts(operator, permissions))
}
