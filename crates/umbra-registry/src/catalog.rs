//! Credential type catalog

use tracing::info;
use umbra_core::{CredentialType, CredentialTypeId, Result};

use crate::authz::require_active_issuer;
use crate::events::RegistryEvent;
use crate::state::{require_len, require_text, CallContext, RegistryState};

/// Allocate the next id and store an immutable catalog entry owned by the caller
pub(crate) fn issue(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    name: String,
    description: String,
) -> Result<(CredentialTypeId, RegistryEvent)> {
    require_active_issuer(state, ctx)?;
    require_text("credential type name", &name, ctx.config.max_name_len)?;
    require_len("description", &description, ctx.config.max_description_len)?;

    let id = state.counters.next_credential_type_id;
    let next = id.next()?;

    info!(type_id = %id, name = %name, owner = %ctx.caller, "credential type issued");

    let event = RegistryEvent::CredentialTypeIssued {
        type_id: id,
        name: name.clone(),
        owner: ctx.caller.clone(),
        height: ctx.now,
    };
    state.credential_types.insert(
        id,
        CredentialType {
            id,
            name,
            description,
            owner: ctx.caller.clone(),
            created_at: ctx.now,
        },
    );
    state.counters.next_credential_type_id = next;

    Ok((id, event))
}
