//! Credential type catalog entries
//!
//! A credential type is a namespaced claim definition such as "age >= 18".
//! Entries are immutable once created.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::identity::{Height, Principal};

/// Globally unique, monotonically allocated credential type id (starts at 1)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CredentialTypeId(pub u64);

impl CredentialTypeId {
    /// First id handed out by a fresh catalog
    pub const FIRST: CredentialTypeId = CredentialTypeId(1);

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Following id. Fails with `Storage` once the id space is used up.
    pub fn next(&self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| RegistryError::Storage("credential type ids exhausted".into()))
    }
}

impl std::fmt::Display for CredentialTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialType {
    pub id: CredentialTypeId,
    pub name: String,
    pub description: String,

    /// The issuer that defined this type
    pub owner: Principal,

    pub created_at: Height,
}
