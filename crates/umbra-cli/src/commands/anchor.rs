//! Revocation anchor commands
//!
//! `build` computes a revocation root from the issuer's list of unrevoked
//! attestations; `update` publishes a root to the registry.

use anyhow::{bail, Context, Result};
use console::style;
use serde::Deserialize;
use std::fs;
use umbra_core::{CredentialTypeId, Digest, Principal};
use umbra_crypto::{status_leaf, RevocationTree};

use super::parse_digest;
use crate::ledger::Ledger;

/// One unrevoked attestation in an entries file
#[derive(Debug, Deserialize)]
pub struct StatusEntry {
    pub subject: String,
    pub proof: String,
}

/// Build the status tree for `type_id` from a JSON entries file
pub fn build_root(entries_file: &str, type_id: u64, depth: usize) -> Result<Digest> {
    let content = fs::read_to_string(entries_file)
        .with_context(|| format!("cannot read {entries_file}"))?;
    let entries: Vec<StatusEntry> = serde_json::from_str(&content)?;

    let mut leaves = Vec::with_capacity(entries.len());
    for entry in &entries {
        let proof = parse_digest(&entry.proof)?;
        leaves.push(status_leaf(
            &Principal::new(entry.subject.as_str()),
            CredentialTypeId(type_id),
            &proof,
        ));
    }

    let tree = RevocationTree::from_leaves(depth, leaves)?;
    Ok(tree.root_digest())
}

pub fn build(entries_file: &str, type_id: u64, depth: usize) -> Result<Digest> {
    let root = build_root(entries_file, type_id, depth)?;

    println!("{}", style("✓ Revocation root computed").green().bold());
    println!("  Type:  {}", type_id);
    println!("  Root:  {}", style(&root).yellow());
    Ok(root)
}

pub fn publish(ledger: &Ledger, caller: &Principal, type_id: u64, root: Digest) -> Result<()> {
    ledger
        .registry
        .update_merkle_anchor(caller, CredentialTypeId(type_id), root)?;

    println!("{}", style("✓ Merkle anchor updated").green().bold());
    println!("  Height:  {}", ledger.height());
    Ok(())
}

pub fn update(ledger: &Ledger, caller: &Principal, type_id: u64, root: &str) -> Result<()> {
    publish(ledger, caller, type_id, parse_digest(root)?)
}

pub fn show(ledger: &Ledger, issuer: &str, type_id: u64) -> Result<()> {
    let Some(anchor) = ledger
        .registry
        .get_merkle_anchor(&Principal::new(issuer), CredentialTypeId(type_id))?
    else {
        bail!("No anchor for issuer {} and type {}", issuer, type_id);
    };

    println!("\n{}", style("Revocation Anchor").bold().underlined());
    println!("  Root:           {}", style(&anchor.root).yellow());
    println!("  Updated at:     {}", anchor.updated_at);
    println!("  Anchor height:  {}", anchor.anchor_height);
    Ok(())
}
