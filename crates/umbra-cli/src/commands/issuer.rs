//! Issuer management commands (owner only)

use anyhow::{bail, Result};
use console::style;
use umbra_core::{CredentialTypeId, Principal};

use super::{type_ids, yes_no};
use crate::ledger::Ledger;

pub fn register(
    ledger: &Ledger,
    caller: &Principal,
    identity: &str,
    name: &str,
    initial_types: &[u64],
) -> Result<()> {
    ledger.registry.register_issuer(
        caller,
        Principal::new(identity),
        name,
        type_ids(initial_types),
    )?;

    println!("{}", style("✓ Issuer registered").green().bold());
    println!("  Issuer:  {}", style(identity).cyan());
    println!("  Name:    {}", name);
    Ok(())
}

pub fn set_status(ledger: &Ledger, caller: &Principal, identity: &str, active: bool) -> Result<()> {
    ledger
        .registry
        .set_issuer_status(caller, &Principal::new(identity), active)?;

    let label = if active { "activated" } else { "deactivated" };
    println!("{} {}", style("✓ Issuer").green().bold(), style(label).green().bold());
    Ok(())
}

pub fn add_type(ledger: &Ledger, caller: &Principal, identity: &str, type_id: u64) -> Result<()> {
    ledger.registry.add_supported_type(
        caller,
        &Principal::new(identity),
        CredentialTypeId(type_id),
    )?;

    println!("{}", style("✓ Supported type added").green().bold());
    println!("  Issuer:  {}", style(identity).cyan());
    println!("  Type:    {}", type_id);
    Ok(())
}

pub fn show(ledger: &Ledger, identity: &str) -> Result<()> {
    let Some(issuer) = ledger.registry.get_issuer(&Principal::new(identity))? else {
        bail!("Unknown issuer: {}", identity);
    };

    println!("\n{}", style("Issuer").bold().underlined());
    println!("  Identity:       {}", style(&issuer.identity).cyan());
    println!("  Name:           {}", issuer.name);
    println!("  Registered at:  {}", issuer.registered_at);
    println!("  Active:         {}", yes_no(issuer.active));
    let types: Vec<String> = issuer
        .supported_types
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "  Types:          {}",
        if types.is_empty() {
            style("none".to_string()).dim()
        } else {
            style(types.join(", "))
        }
    );
    Ok(())
}
