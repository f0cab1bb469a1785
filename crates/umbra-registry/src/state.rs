//! Registry state
//!
//! All stores and counters live in one [`RegistryState`] value owned by the
//! [`Registry`](crate::Registry). Operations receive it by reference together
//! with a [`CallContext`] describing who is calling and when.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use umbra_core::{
    Attestation, ChallengeNonce, ChallengeRecord, Counters, CredentialType, CredentialTypeId,
    Height, Issuer, Principal, RegistryError, Result, RevocationAnchor,
};

use crate::config::RegistryConfig;

/// Everything the registry persists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    #[serde(with = "entries")]
    pub(crate) issuers: BTreeMap<Principal, Issuer>,

    #[serde(with = "entries")]
    pub(crate) credential_types: BTreeMap<CredentialTypeId, CredentialType>,

    /// Keyed by (issuer, credential type)
    #[serde(with = "entries")]
    pub(crate) anchors: BTreeMap<(Principal, CredentialTypeId), RevocationAnchor>,

    /// Keyed by (subject, credential type)
    #[serde(with = "entries")]
    pub(crate) attestations: BTreeMap<(Principal, CredentialTypeId), Attestation>,

    /// Keyed by (requester, nonce)
    #[serde(with = "entries")]
    pub(crate) challenges: BTreeMap<(Principal, ChallengeNonce), ChallengeRecord>,

    pub(crate) counters: Counters,
}

impl RegistryState {
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn issuer(&self, identity: &Principal) -> Option<&Issuer> {
        self.issuers.get(identity)
    }

    pub fn issuers(&self) -> impl Iterator<Item = &Issuer> {
        self.issuers.values()
    }

    pub fn credential_type(&self, id: CredentialTypeId) -> Option<&CredentialType> {
        self.credential_types.get(&id)
    }

    pub fn credential_types(&self) -> impl Iterator<Item = &CredentialType> {
        self.credential_types.values()
    }

    pub fn anchor(&self, issuer: &Principal, type_id: CredentialTypeId) -> Option<&RevocationAnchor> {
        self.anchors.get(&(issuer.clone(), type_id))
    }

    pub fn attestation(&self, subject: &Principal, type_id: CredentialTypeId) -> Option<&Attestation> {
        self.attestations.get(&(subject.clone(), type_id))
    }

    pub fn challenge(&self, requester: &Principal, nonce: ChallengeNonce) -> Option<&ChallengeRecord> {
        self.challenges.get(&(requester.clone(), nonce))
    }
}

/// Who is calling, when, and under which limits
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub caller: &'a Principal,
    pub owner: &'a Principal,
    pub now: Height,
    pub anchor_height: Height,
    pub config: &'a RegistryConfig,
}

/// Non-empty (after trimming) and at most `max` bytes
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidInput(format!("{field} must not be empty")));
    }
    require_len(field, value, max)
}

pub(crate) fn require_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(RegistryError::InvalidInput(format!(
            "{field} is {} bytes, at most {max} allowed",
            value.len()
        )));
    }
    Ok(())
}

/// Maps serialize as `[key, value]` entry lists so composite keys survive JSON
mod entries {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
