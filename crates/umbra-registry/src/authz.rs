//! Authorization predicates
//!
//! The trust chain owner -> issuer -> credential type is checked by composing
//! these predicates over the current records.

use tracing::warn;
use umbra_core::{CredentialTypeId, Issuer, Principal, RegistryError, Result};

use crate::state::{CallContext, RegistryState};

/// Registered and active
pub fn is_active_issuer(state: &RegistryState, identity: &Principal) -> bool {
    state.issuer(identity).is_some_and(|issuer| issuer.active)
}

/// `type_id` is in the issuer's supported list. Activity is not considered.
pub fn is_authorized_for_type(
    state: &RegistryState,
    identity: &Principal,
    type_id: CredentialTypeId,
) -> bool {
    state
        .issuer(identity)
        .is_some_and(|issuer| issuer.supports_type(type_id))
}

pub(crate) fn require_owner(ctx: &CallContext<'_>) -> Result<()> {
    if ctx.caller != ctx.owner {
        warn!(caller = %ctx.caller, "owner-only operation rejected");
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}

pub(crate) fn require_active_issuer<'s>(
    state: &'s RegistryState,
    ctx: &CallContext<'_>,
) -> Result<&'s Issuer> {
    match state.issuer(ctx.caller) {
        Some(issuer) if issuer.active => Ok(issuer),
        _ => {
            warn!(caller = %ctx.caller, "caller is not an active issuer");
            Err(RegistryError::Unauthorized)
        }
    }
}

pub(crate) fn require_issuer_for_type<'s>(
    state: &'s RegistryState,
    ctx: &CallContext<'_>,
    type_id: CredentialTypeId,
) -> Result<&'s Issuer> {
    let issuer = require_active_issuer(state, ctx)?;
    if !issuer.supports_type(type_id) {
        warn!(caller = %ctx.caller, %type_id, "issuer not authorized for credential type");
        return Err(RegistryError::Unauthorized);
    }
    Ok(issuer)
}
