//! Attestation store
//!
//! At most one attestation per (subject, credential type). Re-issuing
//! overwrites the previous record; revocation keeps the record and flips its
//! status. Validity is derived from the clock at read time.

use tracing::{debug, info, warn};
use umbra_core::{
    Attestation, AttestationState, AttestationStatus, CredentialTypeId, Digest, Height,
    Principal, RegistryError, Result,
};

use crate::authz::require_issuer_for_type;
use crate::events::RegistryEvent;
use crate::state::{CallContext, RegistryState};

pub(crate) fn verify(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    subject: Principal,
    type_id: CredentialTypeId,
    proof_digest: Digest,
    valid_until: Height,
) -> Result<RegistryEvent> {
    require_issuer_for_type(state, ctx, type_id)?;

    if valid_until <= ctx.now {
        return Err(RegistryError::ExpiredWindow);
    }
    let max = ctx.config.max_validity_period;
    if valid_until - ctx.now >= max {
        return Err(RegistryError::WindowTooLong { max });
    }
    if proof_digest.is_empty() {
        return Err(RegistryError::InvalidProof);
    }

    info!(
        subject = %subject,
        %type_id,
        issuer = %ctx.caller,
        valid_until,
        "attestation verified"
    );

    let event = RegistryEvent::AttestationVerified {
        subject: subject.clone(),
        type_id,
        issuer: ctx.caller.clone(),
        valid_until,
        height: ctx.now,
    };
    state.attestations.insert(
        (subject, type_id),
        Attestation {
            proof_digest,
            issued_at: ctx.now,
            valid_until,
            issuer: ctx.caller.clone(),
            status: AttestationStatus::Active,
        },
    );
    state.counters.total_attestations += 1;

    Ok(event)
}

/// Only the identity that issued the attestation may revoke it. Revoking an
/// already revoked record succeeds and changes nothing.
pub(crate) fn revoke(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    subject: &Principal,
    type_id: CredentialTypeId,
) -> Result<RegistryEvent> {
    let attestation = state
        .attestations
        .get_mut(&(subject.clone(), type_id))
        .ok_or_else(|| RegistryError::NotFound(format!("attestation {subject}/{type_id}")))?;

    if &attestation.issuer != ctx.caller {
        warn!(caller = %ctx.caller, issuer = %attestation.issuer, "revocation by non-issuer rejected");
        return Err(RegistryError::Unauthorized);
    }
    attestation.status = AttestationStatus::Revoked;

    info!(subject = %subject, %type_id, issuer = %ctx.caller, "attestation revoked");

    Ok(RegistryEvent::AttestationRevoked {
        subject: subject.clone(),
        type_id,
        issuer: ctx.caller.clone(),
        height: ctx.now,
    })
}

pub(crate) fn is_valid(
    state: &RegistryState,
    subject: &Principal,
    type_id: CredentialTypeId,
    now: Height,
) -> bool {
    let valid = state
        .attestation(subject, type_id)
        .is_some_and(|att| att.is_valid_at(now));
    debug!(subject = %subject, %type_id, now, valid, "validity check");
    valid
}

/// Absence counts as revoked. Use [`state_of`] to tell the two apart.
pub(crate) fn is_revoked(state: &RegistryState, subject: &Principal, type_id: CredentialTypeId) -> bool {
    state
        .attestation(subject, type_id)
        .map_or(true, Attestation::is_revoked)
}

pub(crate) fn state_of(
    state: &RegistryState,
    subject: &Principal,
    type_id: CredentialTypeId,
    now: Height,
) -> AttestationState {
    state
        .attestation(subject, type_id)
        .map_or(AttestationState::Missing, |att| att.state_at(now))
}

pub(crate) fn batch_check(
    state: &RegistryState,
    subject: &Principal,
    type_ids: &[CredentialTypeId],
    now: Height,
    max_batch: usize,
) -> Result<Vec<bool>> {
    if type_ids.len() > max_batch {
        return Err(RegistryError::InvalidInput(format!(
            "batch of {} type ids, at most {max_batch} allowed",
            type_ids.len()
        )));
    }

    Ok(type_ids
        .iter()
        .map(|type_id| is_valid(state, subject, *type_id, now))
        .collect())
}
