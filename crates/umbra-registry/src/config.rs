//! Registry configuration

use serde::{Deserialize, Serialize};
use umbra_core::{RegistryError, Result};

/// Deployment name reported in the `contract-deployed` event
pub const DEFAULT_NAME: &str = "umbra-attestation-registry";

/// Limits and identity of a registry deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Deployment name
    pub name: String,

    /// Deployment version
    pub version: String,

    /// Maximum issuer / credential type name length in bytes
    pub max_name_len: usize,

    /// Maximum credential type description length in bytes
    pub max_description_len: usize,

    /// Maximum number of credential types a single issuer may support
    pub max_supported_types: usize,

    /// An attestation's `valid_until - now` span must stay strictly below this
    pub max_validity_period: u64,

    /// Heights after creation during which a challenge can be answered
    pub challenge_window: u64,

    /// Maximum number of type ids accepted by a batch check
    pub max_batch_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_name_len: 64,
            max_description_len: 256,
            max_supported_types: 20,
            // roughly one year of ten-minute blocks
            max_validity_period: 52_560,
            challenge_window: 100,
            max_batch_size: 10,
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_supported_types: env_or("UMBRA_MAX_SUPPORTED_TYPES", default.max_supported_types),
            max_validity_period: env_or("UMBRA_MAX_VALIDITY_PERIOD", default.max_validity_period),
            challenge_window: env_or("UMBRA_CHALLENGE_WINDOW", default.challenge_window),
            max_batch_size: env_or("UMBRA_MAX_BATCH_SIZE", default.max_batch_size),
            ..default
        }
    }

    /// Reject limits that would make every operation fail
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidInput("deployment name is empty".into()));
        }

        let limits = [
            ("max_name_len", self.max_name_len as u64),
            ("max_description_len", self.max_description_len as u64),
            ("max_supported_types", self.max_supported_types as u64),
            ("max_validity_period", self.max_validity_period),
            ("challenge_window", self.challenge_window),
            ("max_batch_size", self.max_batch_size as u64),
        ];

        for (field, value) in limits {
            if value == 0 {
                return Err(RegistryError::InvalidInput(format!("{field} must be positive")));
            }
        }

        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
