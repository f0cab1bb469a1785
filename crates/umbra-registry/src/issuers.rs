//! Issuer directory
//!
//! Only the registry owner creates issuers, toggles their status and extends
//! their supported credential types. Issuers are never deleted.

use tracing::info;
use umbra_core::{CredentialTypeId, Issuer, Principal, RegistryError, Result};

use crate::authz::require_owner;
use crate::events::RegistryEvent;
use crate::state::{require_text, CallContext, RegistryState};

pub(crate) fn register(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    identity: Principal,
    name: String,
    initial_types: Vec<CredentialTypeId>,
) -> Result<RegistryEvent> {
    require_owner(ctx)?;

    if state.issuers.contains_key(&identity) {
        return Err(RegistryError::AlreadyExists(format!("issuer {identity}")));
    }
    require_text("issuer name", &name, ctx.config.max_name_len)?;
    if initial_types.len() > ctx.config.max_supported_types {
        return Err(RegistryError::CapacityExceeded {
            limit: ctx.config.max_supported_types,
        });
    }

    info!(issuer = %identity, name = %name, types = initial_types.len(), "issuer registered");

    let event = RegistryEvent::IssuerRegistered {
        issuer: identity.clone(),
        name: name.clone(),
        height: ctx.now,
    };
    state.issuers.insert(
        identity.clone(),
        Issuer {
            identity,
            name,
            registered_at: ctx.now,
            active: true,
            supported_types: initial_types,
        },
    );
    state.counters.total_issuers += 1;

    Ok(event)
}

pub(crate) fn set_status(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    identity: &Principal,
    active: bool,
) -> Result<RegistryEvent> {
    require_owner(ctx)?;

    let issuer = state
        .issuers
        .get_mut(identity)
        .ok_or_else(|| RegistryError::NotFound(format!("issuer {identity}")))?;
    issuer.active = active;

    info!(issuer = %identity, active, "issuer status changed");

    Ok(RegistryEvent::IssuerStatusChanged {
        issuer: identity.clone(),
        active,
        height: ctx.now,
    })
}

pub(crate) fn add_supported_type(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    identity: &Principal,
    type_id: CredentialTypeId,
) -> Result<RegistryEvent> {
    require_owner(ctx)?;

    let limit = ctx.config.max_supported_types;
    let issuer = state
        .issuers
        .get_mut(identity)
        .ok_or_else(|| RegistryError::NotFound(format!("issuer {identity}")))?;
    if issuer.supported_types.len() >= limit {
        return Err(RegistryError::CapacityExceeded { limit });
    }
    issuer.supported_types.push(type_id);

    info!(issuer = %identity, %type_id, "supported type added");

    Ok(RegistryEvent::SupportedTypeAdded {
        issuer: identity.clone(),
        type_id,
        height: ctx.now,
    })
}
