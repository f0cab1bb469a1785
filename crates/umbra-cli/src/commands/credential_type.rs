//! Credential type catalog commands

use anyhow::{bail, Result};
use console::style;
use umbra_core::{CredentialTypeId, Principal};

use crate::ledger::Ledger;

pub fn issue(ledger: &Ledger, caller: &Principal, name: &str, description: &str) -> Result<()> {
    let id = ledger
        .registry
        .issue_credential_type(caller, name, description)?;

    println!("{}", style("✓ Credential type issued").green().bold());
    println!("  Type ID: {}", style(id).yellow());
    println!("  Name:    {}", name);
    Ok(())
}

pub fn show(ledger: &Ledger, id: u64) -> Result<()> {
    let Some(entry) = ledger.registry.get_credential_type(CredentialTypeId(id))? else {
        bail!("Unknown credential type: {}", id);
    };

    println!("\n{}", style("Credential Type").bold().underlined());
    println!("  ID:           {}", style(entry.id).yellow());
    println!("  Name:         {}", entry.name);
    println!("  Description:  {}", entry.description);
    println!("  Owner:        {}", style(&entry.owner).cyan());
    println!("  Created at:   {}", entry.created_at);
    Ok(())
}
