//! Error types for the authorization engine

use thiserror::Error;

/// Why a policy identifier could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// Identifier does not start with the reserved prefix
    #[error("missing reserved prefix")]
    MissingPrefix,

    /// No operator digit follows the prefix
    #[error("missing operator digit")]
    MissingOperatorDigit,

    /// Operator digit does not map to a known operator
    #[error("unknown operator digit {0}")]
    UnknownOperatorDigit(u32),

    /// Operator digit is not followed by the separator
    #[error("missing separator after operator digit")]
    MissingSeparator,

    /// No permissions left after dropping empty segments
    #[error("no permissions")]
    NoPermissions,
}

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Policy identifier carries the reserved prefix but cannot be decoded
    #[error("Malformed policy identifier '{identifier}': {reason}")]
    MalformedPolicyIdentifier {
        identifier: String,
        reason: MalformedReason,
    },

    /// Permission cannot be encoded into a policy identifier
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    /// Invalid static policy definition
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Policy not found in the cache, the naming convention or the static registry
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthzError {
    pub(crate) fn malformed(identifier: &str, reason: MalformedReason) -> Self {
        Self::MalformedPolicyIdentifier {
            identifier: identifier.to_string(),
            reason,
        }
    }

    /// True for any decode-time failure, including unknown operator digits
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPolicyIdentifier { .. })
    }

    /// True when the identifier was rejected because of an out-of-range operator digit
    pub fn is_unknown_operator(&self) -> bool {
        matches!(
            self,
            Self::MalformedPolicyIdentifier {
                reason: MalformedReason::UnknownOperatorDigit(_),
                ..
            }
        )
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
