//! Registry-wide monotonic counters

use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeNonce;
use crate::credential::CredentialTypeId;

/// Counters advance exactly once per successful creating operation and are
/// never decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub next_credential_type_id: CredentialTypeId,
    pub next_nonce: ChallengeNonce,
    pub total_issuers: u64,
    pub total_attestations: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            next_credential_type_id: CredentialTypeId::FIRST,
            next_nonce: ChallengeNonce::FIRST,
            total_issuers: 0,
            total_attestations: 0,
        }
    }
}
