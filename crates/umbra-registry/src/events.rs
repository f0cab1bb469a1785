//! Registry events
//!
//! Structured records for external observers and indexers. Nothing inside
//! the registry reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use umbra_core::{ChallengeNonce, CredentialTypeId, Digest, Height, Principal};

/// Event payloads, tagged by kebab-case `event` name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum RegistryEvent {
    ContractDeployed {
        name: String,
        version: String,
        height: Height,
    },
    IssuerRegistered {
        issuer: Principal,
        name: String,
        height: Height,
    },
    IssuerStatusChanged {
        issuer: Principal,
        active: bool,
        height: Height,
    },
    SupportedTypeAdded {
        issuer: Principal,
        type_id: CredentialTypeId,
        height: Height,
    },
    CredentialTypeIssued {
        type_id: CredentialTypeId,
        name: String,
        owner: Principal,
        height: Height,
    },
    MerkleAnchorUpdated {
        issuer: Principal,
        type_id: CredentialTypeId,
        root: Digest,
        height: Height,
    },
    AttestationVerified {
        subject: Principal,
        type_id: CredentialTypeId,
        issuer: Principal,
        valid_until: Height,
        height: Height,
    },
    AttestationRevoked {
        subject: Principal,
        type_id: CredentialTypeId,
        issuer: Principal,
        height: Height,
    },
    ChallengeCreated {
        requester: Principal,
        nonce: ChallengeNonce,
        height: Height,
    },
    ChallengeConsumed {
        requester: Principal,
        nonce: ChallengeNonce,
        height: Height,
    },
}

impl RegistryEvent {
    /// Kebab-case event name, as serialized
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::ContractDeployed { .. } => "contract-deployed",
            RegistryEvent::IssuerRegistered { .. } => "issuer-registered",
            RegistryEvent::IssuerStatusChanged { .. } => "issuer-status-changed",
            RegistryEvent::SupportedTypeAdded { .. } => "supported-type-added",
            RegistryEvent::CredentialTypeIssued { .. } => "credential-type-issued",
            RegistryEvent::MerkleAnchorUpdated { .. } => "merkle-anchor-updated",
            RegistryEvent::AttestationVerified { .. } => "attestation-verified",
            RegistryEvent::AttestationRevoked { .. } => "attestation-revoked",
            RegistryEvent::ChallengeCreated { .. } => "challenge-created",
            RegistryEvent::ChallengeConsumed { .. } => "challenge-consumed",
        }
    }
}

/// An emitted event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: RegistryEvent,
}

impl EventRecord {
    pub fn new(event: RegistryEvent) -> Self {
        Self {
            id: format!("evt_{}", uuid::Uuid::new_v4().simple()),
            emitted_at: Utc::now(),
            event,
        }
    }
}

/// Destination for emitted events
pub trait EventSink: Send + Sync {
    fn emit(&self, record: EventRecord);
}

/// In-memory event log (for development/testing and the CLI)
#[derive(Debug, Default)]
pub struct EventLog {
    records: Mutex<Vec<EventRecord>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record emitted so far
    pub fn records(&self) -> Vec<EventRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.records().into_iter().map(|r| r.event).collect()
    }
}

impl EventSink for EventLog {
    fn emit(&self, record: EventRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
