//! Revocation anchors
//!
//! An anchor is the latest merkle root an issuer published for one of its
//! credential types. Relying parties check off-chain revocation witnesses
//! against it; the registry stores the root without interpreting it.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::identity::Height;

/// Latest revocation snapshot for an (issuer, credential type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationAnchor {
    /// Merkle root committing to the current revocation set
    pub root: Digest,

    /// Registry height of the last update
    pub updated_at: Height,

    /// Height the root was anchored at, as reported by the clock
    pub anchor_height: Height,
}
