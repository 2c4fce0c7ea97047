//! Address resolution subsystem.
//!
//! # Data Flow
//! ```text
//! postal code
//!     → race.rs (spawn one task per provider, buffered completion channel)
//!     → select! { first qualifying completion, deadline }
//!     → remaining provider tasks aborted
//!     → ResolutionOutcome
//! ```
//!
//! # Design Decisions
//! - Fail-fast by default: a fast failure ends the race
//! - `first_success` policy available when exhaustiveness beats latency
//! - One deadline per resolution, independent of provider call timeouts
//! - No retries, no caching, no merging of provider answers

pub mod policy;
pub mod race;

use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::{ProviderConfig, ResolverConfig};
use crate::lookup::{build_providers, AddressProvider, ResolutionOutcome};

pub use policy::RacePolicy;
pub use race::resolve;

/// A configured set of providers raced under one time budget.
#[derive(Clone)]
pub struct AddressResolver {
    providers: Vec<Arc<dyn AddressProvider>>,
    timeout: Duration,
    policy: RacePolicy,
}

impl AddressResolver {
    pub fn new(
        providers: Vec<Arc<dyn AddressProvider>>,
        timeout: Duration,
        policy: RacePolicy,
    ) -> Self {
        Self {
            providers,
            timeout,
            policy,
        }
    }

    /// Build the HTTP providers described by the configuration.
    pub fn from_config(
        resolver: &ResolverConfig,
        providers: &[ProviderConfig],
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_providers(providers)?,
            Duration::from_millis(resolver.timeout_ms),
            resolver.policy,
        ))
    }

    /// Race every provider for `code`.
    pub async fn resolve(&self, code: &str) -> ResolutionOutcome {
        resolve(code, &self.providers, self.timeout, self.policy).await
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn policy(&self) -> RacePolicy {
        self.policy
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}
