//! # Permission Authorization Engine
//!
//! Claims-based authorization driven by self-describing policy identifiers.
//!
//! ## Features
//!
//! - **Policy naming convention**: `PERMISSION_<op>_<perm1>_<perm2>...` encodes an
//!   AND/OR permission requirement directly in the identifier
//! - **Lazy resolution**: requirements are decoded on first use and cached, so
//!   no per-endpoint registration is needed
//! - **Static fallback**: identifiers outside the convention resolve through a
//!   registry of named policies
//! - **Fail-closed**: malformed or unknown identifiers always deny
//! - **Thread-safe**: DashMap-backed cache, no global state
//!
//! ## Example
//!
//! ```rust
//! use permission_authz::{AuthorizationGate, ClaimSet, GateConfig, OutcomeReason};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gate = AuthorizationGate::new(GateConfig::default())?;
//!
//! let claims = ClaimSet::with_permissions(["ride.discard", "ride.book"]);
//! let outcome = gate.authorize(&["PERMISSION_1_ride.discard_ride.book_ride.view"], &claims);
//!
//! assert!(!outcome.is_allowed());
//! assert_eq!(outcome.reason, OutcomeReason::MissingPermissions);
//! assert_eq!(outcome.missing_permissions, Some(vec!["ride.view".to_string()]));
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod config;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod policy;
pub mod types;

// Re-export commonly used types
pub use claims::{ClaimLookup, ClaimSet, PERMISSIONS_CLAIM_TYPE};
pub use config::{GateConfig, StaticPolicyConfig};
pub use endpoint::{EndpointPolicies, EndpointRegistry};
pub use engine::{
    AuthorizationGate, DenialPayload, Effect, Outcome, OutcomeReason, PolicyResolver,
    RequirementEvaluator, Resolution,
};
pub use error::{AuthzError, MalformedReason, Result};
pub use policy::StaticPolicyRegistry;
pub use types::{PermissionId, PermissionOperator, PermissionRequirement, PolicyId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
