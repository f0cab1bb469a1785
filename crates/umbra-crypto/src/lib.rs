//! Umbra Crypto
//!
//! Off-chain helpers around the registry: SHA3-256 digests for proof material
//! and challenges, and the sparse merkle tree issuers use to compute the
//! revocation roots they anchor.

pub mod hash;
pub mod tree;

pub use hash::{challenge_digest, proof_digest, random_digest, sha3_256, sha3_256_multi, status_leaf};
pub use tree::{RevocationTree, StatusWitness, TreeError};
