//! Test utilities for integration tests

use std::sync::Arc;
use umbra_core::{CredentialTypeId, Principal};
use umbra_registry::{EventLog, ManualClock, Registry, RegistryConfig};

/// Registry wrapper with a controllable clock and captured events
pub struct TestRegistry {
    pub registry: Registry,
    pub clock: Arc<ManualClock>,
    pub events: Arc<EventLog>,
    pub owner: Principal,
}

impl TestRegistry {
    /// Fresh registry at height 1000 owned by `owner`
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let clock = Arc::new(ManualClock::new(1000));
        let events = Arc::new(EventLog::new());
        let owner = Principal::new("owner");
        let registry =
            Registry::initialize(config, owner.clone(), clock.clone(), events.clone()).unwrap();

        Self {
            registry,
            clock,
            events,
            owner,
        }
    }

    /// Register `name` as an active issuer and give it a fresh credential type
    pub fn issuer_with_type(&self, name: &str) -> (Principal, CredentialTypeId) {
        let issuer = Principal::new(name);
        self.registry
            .register_issuer(&self.owner, issuer.clone(), name, vec![])
            .unwrap();
        let type_id = self
            .registry
            .issue_credential_type(&issuer, format!("{name}-claim"), "test claim")
            .unwrap();
        self.registry
            .add_supported_type(&self.owner, &issuer, type_id)
            .unwrap();
        (issuer, type_id)
    }

    pub fn now(&self) -> u64 {
        self.registry.height()
    }
}
