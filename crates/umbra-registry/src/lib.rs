//! Umbra Registry
//!
//! Ledger-backed attestation registry. Approved issuers define credential
//! types, post proof digests attesting that a subject satisfies one, anchor
//! revocation roots, and revoke what they issued. Callers can also run a
//! nonce-based proof-of-possession handshake.
//!
//! Every mutation runs under the state write lock: it resolves the caller,
//! checks the owner -> issuer -> credential type chain, validates its inputs
//! and only then writes, so a failed call leaves the state untouched. Reads
//! derive validity from the current clock height.

pub mod authz;
pub mod challenges;
pub mod clock;
pub mod config;
pub mod events;
pub mod state;

mod anchors;
mod attestations;
mod catalog;
mod issuers;

pub use challenges::{NonceOnly, PossessionCheck};
pub use clock::{Clock, ManualClock};
pub use config::RegistryConfig;
pub use events::{EventLog, EventRecord, EventSink, RegistryEvent};
pub use state::{CallContext, RegistryState};

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use umbra_core::{
    Attestation, AttestationState, ChallengeNonce, ChallengeRecord, Counters, CredentialType,
    CredentialTypeId, Digest, Height, Issuer, Principal, RegistryError, Result, RevocationAnchor,
};

/// Serializable image of a registry deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: Principal,
    pub deployed_at: Height,
    pub config: RegistryConfig,
    pub state: RegistryState,
}

/// The attestation registry
pub struct Registry {
    config: RegistryConfig,
    owner: Principal,
    deployed_at: Height,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    possession: Arc<dyn PossessionCheck>,
    state: RwLock<RegistryState>,
}

impl Registry {
    /// Deploy a fresh registry owned by `owner` and emit `contract-deployed`.
    pub fn initialize(
        config: RegistryConfig,
        owner: Principal,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;

        let height = clock.height();
        info!(
            name = %config.name,
            version = %config.version,
            owner = %owner,
            height,
            "registry deployed"
        );
        events.emit(EventRecord::new(RegistryEvent::ContractDeployed {
            name: config.name.clone(),
            version: config.version.clone(),
            height,
        }));

        Ok(Self {
            config,
            owner,
            deployed_at: height,
            clock,
            events,
            possession: Arc::new(NonceOnly),
            state: RwLock::new(RegistryState::default()),
        })
    }

    /// Rebuild a registry from a snapshot without re-emitting deployment
    pub fn restore(
        snapshot: LedgerSnapshot,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        snapshot.config.validate()?;

        debug!(owner = %snapshot.owner, deployed_at = snapshot.deployed_at, "registry restored");

        Ok(Self {
            config: snapshot.config,
            owner: snapshot.owner,
            deployed_at: snapshot.deployed_at,
            clock,
            events,
            possession: Arc::new(NonceOnly),
            state: RwLock::new(snapshot.state),
        })
    }

    /// Replace the challenge response check
    pub fn with_possession_check(mut self, check: Arc<dyn PossessionCheck>) -> Self {
        self.possession = check;
        self
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            owner: self.owner.clone(),
            deployed_at: self.deployed_at,
            config: self.config.clone(),
            state: self.read_state()?.clone(),
        })
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn deployed_at(&self) -> Height {
        self.deployed_at
    }

    pub fn height(&self) -> Height {
        self.clock.height()
    }

    // ── Issuer directory ────────────────────────────────────────────

    pub fn register_issuer(
        &self,
        caller: &Principal,
        identity: Principal,
        name: impl Into<String>,
        initial_types: Vec<CredentialTypeId>,
    ) -> Result<()> {
        let name = name.into();
        self.transact(caller, |state, ctx| {
            issuers::register(state, ctx, identity, name, initial_types).map(|e| ((), e))
        })
    }

    pub fn set_issuer_status(&self, caller: &Principal, identity: &Principal, active: bool) -> Result<()> {
        self.transact(caller, |state, ctx| {
            issuers::set_status(state, ctx, identity, active).map(|e| ((), e))
        })
    }

    pub fn add_supported_type(
        &self,
        caller: &Principal,
        identity: &Principal,
        type_id: CredentialTypeId,
    ) -> Result<()> {
        self.transact(caller, |state, ctx| {
            issuers::add_supported_type(state, ctx, identity, type_id).map(|e| ((), e))
        })
    }

    pub fn get_issuer(&self, identity: &Principal) -> Result<Option<Issuer>> {
        Ok(self.read_state()?.issuer(identity).cloned())
    }

    pub fn is_active_issuer(&self, identity: &Principal) -> Result<bool> {
        Ok(authz::is_active_issuer(&*self.read_state()?, identity))
    }

    pub fn is_authorized_for_type(&self, identity: &Principal, type_id: CredentialTypeId) -> Result<bool> {
        Ok(authz::is_authorized_for_type(&*self.read_state()?, identity, type_id))
    }

    // ── Credential type catalog ─────────────────────────────────────

    pub fn issue_credential_type(
        &self,
        caller: &Principal,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CredentialTypeId> {
        let (name, description) = (name.into(), description.into());
        self.transact(caller, |state, ctx| catalog::issue(state, ctx, name, description))
    }

    pub fn get_credential_type(&self, id: CredentialTypeId) -> Result<Option<CredentialType>> {
        Ok(self.read_state()?.credential_type(id).cloned())
    }

    // ── Revocation anchors ──────────────────────────────────────────

    pub fn update_merkle_anchor(&self, caller: &Principal, type_id: CredentialTypeId, root: Digest) -> Result<()> {
        self.transact(caller, |state, ctx| {
            anchors::update(state, ctx, type_id, root).map(|e| ((), e))
        })
    }

    pub fn get_merkle_anchor(
        &self,
        issuer: &Principal,
        type_id: CredentialTypeId,
    ) -> Result<Option<RevocationAnchor>> {
        Ok(self.read_state()?.anchor(issuer, type_id).cloned())
    }

    // ── Attestations ────────────────────────────────────────────────

    pub fn verify_attestation(
        &self,
        caller: &Principal,
        subject: Principal,
        type_id: CredentialTypeId,
        proof_digest: Digest,
        valid_until: Height,
    ) -> Result<()> {
        self.transact(caller, |state, ctx| {
            attestations::verify(state, ctx, subject, type_id, proof_digest, valid_until)
                .map(|e| ((), e))
        })
    }

    pub fn revoke_attestation(
        &self,
        caller: &Principal,
        subject: &Principal,
        type_id: CredentialTypeId,
    ) -> Result<()> {
        self.transact(caller, |state, ctx| {
            attestations::revoke(state, ctx, subject, type_id).map(|e| ((), e))
        })
    }

    pub fn get_attestation(&self, subject: &Principal, type_id: CredentialTypeId) -> Result<Option<Attestation>> {
        Ok(self.read_state()?.attestation(subject, type_id).cloned())
    }

    pub fn is_valid(&self, subject: &Principal, type_id: CredentialTypeId) -> Result<bool> {
        let now = self.clock.height();
        Ok(attestations::is_valid(&*self.read_state()?, subject, type_id, now))
    }

    /// True when the attestation is revoked, and also when none exists.
    /// Callers that must tell those apart use [`Registry::attestation_state`].
    pub fn is_revoked(&self, subject: &Principal, type_id: CredentialTypeId) -> Result<bool> {
        Ok(attestations::is_revoked(&*self.read_state()?, subject, type_id))
    }

    pub fn attestation_state(&self, subject: &Principal, type_id: CredentialTypeId) -> Result<AttestationState> {
        let now = self.clock.height();
        Ok(attestations::state_of(&*self.read_state()?, subject, type_id, now))
    }

    /// `is_valid` for each id, in input order
    pub fn batch_check(&self, subject: &Principal, type_ids: &[CredentialTypeId]) -> Result<Vec<bool>> {
        let now = self.clock.height();
        attestations::batch_check(
            &*self.read_state()?,
            subject,
            type_ids,
            now,
            self.config.max_batch_size,
        )
    }

    // ── Challenges ──────────────────────────────────────────────────

    pub fn create_challenge(&self, caller: &Principal, challenge: Digest) -> Result<ChallengeNonce> {
        self.transact(caller, |state, ctx| challenges::create(state, ctx, challenge))
    }

    /// Consume `nonce` if it belongs to the caller, is unused and still fresh.
    /// The response goes through the configured [`PossessionCheck`] only.
    pub fn respond_to_challenge(&self, caller: &Principal, nonce: ChallengeNonce, response: &Digest) -> Result<()> {
        let possession = Arc::clone(&self.possession);
        self.transact(caller, |state, ctx| {
            challenges::respond(state, ctx, nonce, response, possession.as_ref()).map(|e| ((), e))
        })
    }

    pub fn get_challenge(&self, requester: &Principal, nonce: ChallengeNonce) -> Result<Option<ChallengeRecord>> {
        Ok(self.read_state()?.challenge(requester, nonce).cloned())
    }

    pub fn counters(&self) -> Result<Counters> {
        Ok(self.read_state()?.counters().clone())
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Run one mutation under the write lock and emit its event on success.
    /// The event is emitted before the lock is released, so the sink sees
    /// events in commit order.
    fn transact<T>(
        &self,
        caller: &Principal,
        op: impl FnOnce(&mut RegistryState, &CallContext<'_>) -> Result<(T, RegistryEvent)>,
    ) -> Result<T> {
        let mut state = self
            .state
            .write()
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        let ctx = CallContext {
            caller,
            owner: &self.owner,
            now: self.clock.height(),
            anchor_height: self.clock.anchor_height(),
            config: &self.config,
        };

        match op(&mut *state, &ctx) {
            Ok((value, event)) => {
                self.events.emit(EventRecord::new(event));
                Ok(value)
            }
            Err(err) => {
                if err == RegistryError::Unauthorized {
                    warn!(caller = %caller, code = err.code(), "operation rejected: {}", err);
                } else {
                    debug!(caller = %caller, code = err.code(), "operation rejected: {}", err);
                }
                Err(err)
            }
        }
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| RegistryError::Storage(e.to_string()))
    }
}
