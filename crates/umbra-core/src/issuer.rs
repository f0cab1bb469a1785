//! Issuer records
//!
//! Issuers are identities the registry owner has approved to define
//! credential types and attest to subjects holding them.

use serde::{Deserialize, Serialize};

use crate::credential::CredentialTypeId;
use crate::identity::{Height, Principal};

/// A registered issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// The issuer's identity
    pub identity: Principal,

    /// Human-readable name
    pub name: String,

    /// Height at which the owner registered this issuer
    pub registered_at: Height,

    /// Inactive issuers keep their record but lose every issuer privilege
    pub active: bool,

    /// Credential types this issuer may attest to, in the order they were added
    pub supported_types: Vec<CredentialTypeId>,
}

impl Issuer {
    /// Check if this issuer may attest to a specific credential type
    pub fn supports_type(&self, type_id: CredentialTypeId) -> bool {
        self.supported_types.contains(&type_id)
    }
}
