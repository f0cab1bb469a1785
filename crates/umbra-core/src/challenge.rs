//! Proof-of-possession challenge records

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::{RegistryError, Result};
use crate::identity::Height;

/// Monotonically allocated challenge nonce
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChallengeNonce(pub u64);

impl ChallengeNonce {
    pub const FIRST: ChallengeNonce = ChallengeNonce(1);

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Following id. Fails with `Storage` once the id space is used up.
    pub fn next(&self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| RegistryError::Storage("challenge nonces exhausted".into()))
    }
}

impl std::fmt::Display for ChallengeNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pending or consumed challenge, keyed by (requester, nonce)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub challenge: Digest,
    pub created_at: Height,
    pub used: bool,
}

impl ChallengeRecord {
    /// Fresh while fewer than `window` heights have passed since creation
    pub fn is_fresh_at(&self, now: Height, window: u64) -> bool {
        now.saturating_sub(self.created_at) < window
    }
}
