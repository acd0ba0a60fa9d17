//! Policy identifier codec tests
//!
//! Covers the wire format, decode failures and the encode/decode round trip.

use permission_authz::policy::codec::{decode, encode, encode_single, POLICY_PREFIX, SEPARATOR};
use permission_authz::{AuthzError, MalformedReason, PermissionOperator, PermissionRequirement};
use proptest::prelude::*;

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[test]
fn test_wire_constants() {
    assert_eq!(POLICY_PREFIX, "PERMISSION_");
    assert_eq!(SEPARATOR, '_');
}

#[test]
fn test_declared_endpoints_decode() {
    // Declarations used by the identity endpoints
    let alice = decode("PERMISSION_0_ride.view").unwrap();
    assert_eq!(alice.operator(), PermissionOperator::Or);
    assert_eq!(alice.permissions(), &["ride.view"]);

    let bob = decode("PERMISSION_1_ride.discard_ride.book_ride.view").unwrap();
    assert_eq!(bob.operator(), PermissionOperator::And);
    assert_eq!(bob.permissions(), &["ride.discard", "ride.book", "ride.view"]);

    let jan = decode("PERMISSION_1_ride.book_ride.view").unwrap();
    assert_eq!(jan.permissions().len(), 2);
}

#[test]
fn test_requirement_policy_id() {
    let requirement =
        PermissionRequirement::new(PermissionOperator::Or, vec!["invoice.read", "invoice.pay"]).unwrap();
    assert_eq!(requirement.policy_id().unwrap(), "PERMISSION_0_invoice.read_invoice.pay");

    let with_separator = PermissionRequirement::new(PermissionOperator::Or, vec!["invoice_read"]).unwrap();
    assert!(matches!(
        with_separator.policy_id(),
        Err(AuthzError::InvalidPermission(_))
    ));
}

#[test]
fn test_encode_single_round_trip() {
    let id = encode_single("ride.view").unwrap();
    let requirement = decode(&id).unwrap();
    assert_eq!(requirement.operator(), PermissionOperator::And);
    assert_eq!(requirement.permissions(), &["ride.view"]);
}

// ============================================================================
// DECODE FAILURES
// ============================================================================

#[test]
fn test_unknown_operator_digit() {
    for digit in 2..=9 {
        let identifier = format!("PERMISSION_{}_ride.view", digit);
        let err = decode(&identifier).unwrap_err();

        assert!(err.is_unknown_operator(), "digit {} should be unknown", digit);
        match err {
            AuthzError::MalformedPolicyIdentifier { identifier: id, reason } => {
                assert_eq!(id, identifier);
                assert_eq!(reason, MalformedReason::UnknownOperatorDigit(digit));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

#[test]
fn test_prefix_is_case_sensitive() {
    let err = decode("permission_1_ride.view").unwrap_err();
    assert!(err.is_malformed());
    assert!(!err.is_unknown_operator());
}

#[test]
fn test_only_separators_is_malformed() {
    let err = decode("PERMISSION_0_____").unwrap_err();
    assert!(matches!(
        err,
        AuthzError::MalformedPolicyIdentifier {
            reason: MalformedReason::NoPermissions,
            ..
        }
    ));
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

fn operator_strategy() -> impl Strategy<Value = PermissionOperator> {
    prop_oneof![Just(PermissionOperator::And), Just(PermissionOperator::Or)]
}

proptest! {
    #[test]
    fn test_round_trip(
        operator in operator_strategy(),
        permissions in prop::collection::vec("[a-z][a-z0-9.:-]{0,15}", 1..12)
    ) {
        let identifier = encode(operator, permissions.as_slice()).unwrap();
        prop_assert!(identifier.starts_with(POLICY_PREFIX));

        let decoded = decode(&identifier).unwrap();
        let expected = PermissionRequirement::new(operator, permissions.clone()).unwrap();

        prop_assert!(decoded.is_equivalent(&expected));
        prop_assert_eq!(decoded.permissions(), permissions.as_slice());
    }

    #[test]
    fn test_decode_never_panics(input in "\\PC{0,40}") {
        let _ = decode(&input);
        let prefixed = format!("{}{}", POLICY_PREFIX, input);
        let _ = decode(&prefixed);
    }

    #[test]
    fn test_decoded_permissions_are_non_empty(input in "[0-9][_a-z]{0,20}") {
        let identifier = format!("{}{}", POLICY_PREFIX, input);
        if let Ok(requirement) = decode(&identifier) {
            prop_assert!(!requirement.permissions().is_empty());
            prop_assert!(requirement.permissions().iter().all(|p| !p.is_empty() && !p.contains(SEPARATOR)));
        }
    }
}
