//! Attestation records
//!
//! An attestation asserts that a subject satisfies a credential type. It
//! carries an opaque proof digest and a validity window measured in clock
//! heights. At most one attestation exists per (subject, type) at a time.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::identity::{Height, Principal};

/// Lifecycle status. Transitions only from `Active` to `Revoked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    Active,
    Revoked,
}

/// A stored attestation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Commitment to the off-chain proof, asserted valid by the issuer
    pub proof_digest: Digest,

    pub issued_at: Height,

    /// Exclusive upper bound of the validity window
    pub valid_until: Height,

    /// The only identity allowed to revoke this record
    pub issuer: Principal,

    pub status: AttestationStatus,
}

impl Attestation {
    /// Active and not yet past `valid_until`
    pub fn is_valid_at(&self, now: Height) -> bool {
        self.status == AttestationStatus::Active && self.valid_until > now
    }

    pub fn is_revoked(&self) -> bool {
        self.status == AttestationStatus::Revoked
    }

    pub fn state_at(&self, now: Height) -> AttestationState {
        match self.status {
            AttestationStatus::Revoked => AttestationState::Revoked,
            AttestationStatus::Active if self.valid_until > now => AttestationState::Active,
            AttestationStatus::Active => AttestationState::Expired,
        }
    }
}

/// Derived view of a (subject, type) slot that tells "never attested" apart
/// from "revoked".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationState {
    Missing,
    Active,
    Expired,
    Revoked,
}
