//! Revocation anchor store
//!
//! One anchor per (issuer, credential type), overwritten on every update.
//! Roots are opaque here; relying parties check revocation witnesses against
//! them off-chain.

use tracing::info;
use umbra_core::{CredentialTypeId, Digest, RegistryError, Result, RevocationAnchor};

use crate::authz::require_issuer_for_type;
use crate::events::RegistryEvent;
use crate::state::{CallContext, RegistryState};

pub(crate) fn update(
    state: &mut RegistryState,
    ctx: &CallContext<'_>,
    type_id: CredentialTypeId,
    root: Digest,
) -> Result<RegistryEvent> {
    require_issuer_for_type(state, ctx, type_id)?;
    if root.is_empty() {
        return Err(RegistryError::InvalidInput("merkle root is empty".into()));
    }

    info!(issuer = %ctx.caller, %type_id, root = %root, "merkle anchor updated");

    let event = RegistryEvent::MerkleAnchorUpdated {
        issuer: ctx.caller.clone(),
        type_id,
        root: root.clone(),
        height: ctx.now,
    };
    state.anchors.insert(
        (ctx.caller.clone(), type_id),
        RevocationAnchor {
            root,
            updated_at: ctx.now,
            anchor_height: ctx.anchor_height,
        },
    );

    Ok(event)
}
