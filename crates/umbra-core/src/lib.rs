//! Umbra Core
//!
//! Core domain types for the Umbra attestation registry.
//! This crate defines the records, identifiers and error taxonomy shared by
//! the registry, the crypto helpers and the CLI.

pub mod anchor;
pub mod attestation;
pub mod challenge;
pub mod counters;
pub mod credential;
pub mod digest;
pub mod error;
pub mod identity;
pub mod issuer;

pub use anchor::RevocationAnchor;
pub use attestation::{Attestation, AttestationState, AttestationStatus};
pub use challenge::{ChallengeNonce, ChallengeRecord};
pub use counters::Counters;
pub use credential::{CredentialType, CredentialTypeId};
pub use digest::Digest;
pub use error::{RegistryError, Result};
pub use identity::{Height, Principal};
pub use issuer::Issuer;
