//! Challenge registry for the proof-of-possession handshake
//!
//! A caller creates a challenge and later answers it with the nonce it got
//! back. The registry enforces that each nonce is answered at most once, by
//! its requester, within `challenge_window` heights. Whether the response
//! actually proves possession of anything is decided by the configured
//! [`PossessionCheck`]; the default [`NonceOnly`] check accepts every
//! response, so out of the box this is nonce bookkeeping only.

use tracing::{info, warn};
use umbra_core::{ChallengeNonce, ChallengeRecord, Digest, Principal, RegistryError, Result};

use crate::events::RegistryEvent;
use crate::state::{CallContext, RegistryState};

/// Decides whether a challenge response binds the requester to the challenge.
///
/// Runs after the single-use and freshness checks, immediately before the
/// nonce is consumed.
pub trait PossessionCheck: Send + Sync {
    fn check(
        &self,
        requester: &Principal,
        nonce: ChallengeNonce,
        record: &ChallengeRecord,
        response: &Digest,
    ) -> bool;
}

/// Accepts any response. Performs no cryptographic verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceOnly;

impl PossessionCheck for NonceOnly {
    fn check(&self, _: &Principal, _: ChallengeNonce, _: &ChallengeRecord, _: &Digest) -> bool {
        true
    }
}

pub(crate) fn create(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    challenge: Digest,
) -> Result<(ChallengeNonce, RegistryEvent)> {
    if challenge.is_empty() {
        return Err(RegistryError::InvalidInput("challenge digest is empty".into()));
    }

    let nonce = state.counters.next_nonce;
    let next = nonce.next()?;

    info!(requester = %ctx.caller, %nonce, "challenge created");

    state.challenges.insert(
        (ctx.caller.clone(), nonce),
        ChallengeRecord {
            challenge,
            created_at: ctx.now,
            used: false,
        },
    );
    state.counters.next_nonce = next;

    Ok((
        nonce,
        RegistryEvent::ChallengeCreated {
            requester: ctx.caller.clone(),
            nonce,
            height: ctx.now,
        },
    ))
}

pub(crate) fn respond(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    nonce: ChallengeNonce,
    response: &Digest,
    possession: &dyn PossessionCheck,
) -> Result<RegistryEvent> {
    let record = state
        .challenges
        .get_mut(&(ctx.caller.clone(), nonce))
        .ok_or_else(|| RegistryError::NotFound(format!("challenge {nonce} for {}", ctx.caller)))?;

    if record.used {
        warn!(requester = %ctx.caller, %nonce, "challenge replay rejected");
        return Err(RegistryError::AlreadyUsed);
    }
    if !record.is_fresh_at(ctx.now, ctx.config.challenge_window) {
        return Err(RegistryError::Stale);
    }
    if !possession.check(ctx.caller, nonce, record, response) {
        warn!(requester = %ctx.caller, %nonce, "challenge response rejected");
        return Err(RegistryError::InvalidProof);
    }
    record.used = true;

    info!(requester = %ctx.caller, %nonce, "challenge consumed");

    Ok(RegistryEvent::ChallengeConsumed {
        requester: ctx.caller.clone(),
        nonce,
        height: ctx.now,
    })
}
