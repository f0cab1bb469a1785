//! Hash functions for Umbra
//!
//! All registry digests produced by this crate are SHA3-256 with a short
//! domain prefix so that leaves, nodes, proofs and challenges never collide.

use sha3::{Digest as _, Sha3_256};
use umbra_core::{CredentialTypeId, Digest, Principal};

const PROOF_DOMAIN: &[u8] = b"umbra:proof:";
const CHALLENGE_DOMAIN: &[u8] = b"umbra:challenge:";
const LEAF_DOMAIN: &[u8] = b"umbra:leaf:";

/// Compute SHA3-256 hash
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA3-256 hash of multiple byte slices
pub fn sha3_256_multi(data: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for d in data {
        hasher.update(d);
    }
    hasher.finalize().into()
}

/// Digest of serialized proof bytes, suitable as an attestation proof hash
pub fn proof_digest(proof_bytes: &[u8]) -> Digest {
    Digest::from(sha3_256_multi(&[PROOF_DOMAIN, proof_bytes]))
}

/// Digest binding a challenge to its requester and some caller context
pub fn challenge_digest(requester: &Principal, context: &[u8]) -> Digest {
    let requester_hash = sha3_256(requester.as_str().as_bytes());
    Digest::from(sha3_256_multi(&[CHALLENGE_DOMAIN, &requester_hash, context]))
}

/// Random 32-byte digest
pub fn random_digest() -> Digest {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Digest::from(bytes)
}

/// Leaf committing to one unrevoked attestation
pub fn status_leaf(subject: &Principal, type_id: CredentialTypeId, proof: &Digest) -> [u8; 32] {
    let subject_hash = sha3_256(subject.as_str().as_bytes());
    sha3_256_multi(&[
        LEAF_DOMAIN,
        &subject_hash,
        &type_id.get().to_be_bytes(),
        proof.as_bytes(),
    ])
}
