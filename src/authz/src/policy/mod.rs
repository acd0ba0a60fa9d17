//! Policy naming and static policy storage

pub mod codec;
pub mod registry;

pub use codec::{decode, encode, encode_single, is_permission_policy, POLICY_PREFIX, SEPARATOR};
pub use registry::StaticPolicyRegistry;
