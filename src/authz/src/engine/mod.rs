//! Authorization gate
//!
//! Per-request entry point: resolves every policy an endpoint declares,
//! evaluates each against the caller's claims and folds the results into
//! a single fail-closed [`Outcome`].

pub mod cache;
pub mod decision;
pub mod evaluator;
pub mod metrics;
pub mod resolver;

pub use cache::{CacheStats, PolicyCache};
pub use decision::{DenialPayload, Effect, Outcome, OutcomeReason};
pub use evaluator::RequirementEvaluator;
pub use metrics::{GateMetrics, MetricsCollector};
pub use resolver::{PolicyResolver, Resolution, ResolverStats};

use crate::claims::ClaimSet;
use crate::config::GateConfig;
use crate::endpoint::EndpointRegistry;
use crate::error::Result;
use crate::types::PermissionRequirement;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Authorization gate
///
/// # Pipeline
///
/// ```text
/// identifiers ─→ PolicyResolver ─→ RequirementEvaluator ─→ Outcome
///                  ↓        ↓                                 ↓
///               [Cache] [Static registry]                 [Metrics]
/// ```
///
/// A check moves from pending to evaluating to a terminal allowed or denied
/// state within one synchronous call. Denials are final: the same inputs
/// always produce the same outcome.
pub struct AuthorizationGate {
    /// Policy resolution with caching
    resolver: Arc<PolicyResolver>,

    /// Requirement evaluator
    evaluator: RequirementEvaluator,

    /// Route declarations
    endpoints: EndpointRegistry,

    /// Outcome counters
    metrics: MetricsCollector,

    /// Gate configuration
    config: GateConfig,
}

impl AuthorizationGate {
    /// Create a gate, building the static registry and cache from `config`
    pub fn new(config: GateConfig) -> Result<Self> {
        config.validate()?;

        let registry = config.build_registry()?;
        let resolver = Arc::new(PolicyResolver::with_settings(
            registry,
            config.max_cached_policies,
        ));

        Ok(Self::with_resolver(config, resolver))
    }

    /// Create a gate sharing an existing resolver
    ///
    /// `config.static_policies` and `config.max_cached_policies` are ignored;
    /// the resolver already owns its registry and cache.
    pub fn with_resolver(config: GateConfig, resolver: Arc<PolicyResolver>) -> Self {
        info!(
            "AuthorizationGate initialized with claim_type={}, require_authenticated={}, static_policies={}",
            config.claim_type,
            config.require_authenticated,
            resolver.registry().len()
        );

        Self {
            resolver,
            evaluator: RequirementEvaluator::new(config.claim_type.clone()),
            endpoints: EndpointRegistry::new(),
            metrics: MetricsCollector::new(),
            config,
        }
    }

    /// Attach route declarations
    pub fn with_endpoints(mut self, endpoints: EndpointRegistry) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Authorize a call guarded by the given policy identifiers
    ///
    /// Every identifier must resolve and every requirement must be met.
    /// An empty list only applies the authentication check.
    pub fn authorize<S: AsRef<str>>(&self, identifiers: &[S], claims: &ClaimSet) -> Outcome {
        let start = Instant::now();
        let outcome = self.decide(identifiers, claims);
        self.finalize(outcome, start)
    }

    /// Authorize a call to a registered route
    pub fn authorize_endpoint(&self, route: &str, claims: &ClaimSet) -> Outcome {
        match self.endpoints.get(route) {
            Some(declared) => self.authorize(declared.policies(), claims),
            None => {
                warn!("No policy declaration for endpoint '{}'", route);
                let outcome = Outcome::deny(OutcomeReason::UnknownEndpoint, None);
                self.finalize(outcome, Instant::now())
            }
        }
    }

    /// The shared resolver
    pub fn resolver(&self) -> &Arc<PolicyResolver> {
        &self.resolver
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Get gate metrics
    pub fn metrics(&self) -> GateMetrics {
        self.metrics.get_metrics()
    }

    fn decide<S: AsRef<str>>(&self, identifiers: &[S], claims: &ClaimSet) -> Outcome {
        if self.config.require_authenticated && !claims.authenticated {
            debug!("Caller is not authenticated");
            return Outcome::deny(OutcomeReason::NotAuthenticated, None);
        }

        // Resolve everything first so one bad declaration denies regardless of order
        let mut requirements: Vec<(&str, Arc<PermissionRequirement>)> =
            Vec::with_capacity(identifiers.len());

        for identifier in identifiers {
            let identifier = identifier.as_ref();

            match self.resolver.resolve(identifier) {
                Ok(resolution) => match resolution.requirement() {
                    Some(requirement) => requirements.push((identifier, Arc::clone(requirement))),
                    None => {
                        return Outcome::deny(
                            OutcomeReason::PolicyResolutionFailed,
                            Some(identifier.to_string()),
                        );
                    }
                },
                Err(e) if e.is_malformed() => {
                    return Outcome::deny(
                        OutcomeReason::MalformedPolicyIdentifier,
                        Some(identifier.to_string()),
                    );
                }
                Err(e) => {
                    warn!("Resolution error for '{}': {}", identifier, e);
                    return Outcome::deny(
                        OutcomeReason::PolicyResolutionFailed,
                        Some(identifier.to_string()),
                    );
                }
            }
        }

        for (identifier, requirement) in &requirements {
            debug!("Evaluating {} ({})", identifier, requirement);

            if self.evaluator.evaluate(requirement.as_ref(), claims) == Effect::Deny {
                let outcome = Outcome::deny(
                    OutcomeReason::MissingPermissions,
                    Some(identifier.to_string()),
                );

                if !self.config.attach_denial_payload {
                    return outcome;
                }

                let missing = self.evaluator.missing_permissions(requirement.as_ref(), claims);
                return outcome.with_missing_permissions(missing);
            }
        }

        Outcome::allow()
    }

    fn finalize(&self, outcome: Outcome, start: Instant) -> Outcome {
        self.metrics.record(&outcome, start.elapsed());

        debug!(
            "Decision: {} ({:?}{})",
            if outcome.is_allowed() { "ALLOW" } else { "DENY" },
            outcome.reason,
            outcome
                .policy_id
                .as_deref()
                .map(|id| format!(", policy '{}'", id))
                .unwrap_or_default()
        );

        outcome
    }
}
