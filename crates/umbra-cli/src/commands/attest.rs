//! Attestation commands

use anyhow::{bail, Context, Result};
use console::style;
use std::fs;
use umbra_core::{AttestationState, CredentialTypeId, Digest, Height, Principal};
use umbra_crypto::proof_digest;

use super::{parse_digest, type_ids, yes_no};
use crate::ledger::Ledger;

/// Where the proof digest comes from
pub enum ProofSource<'a> {
    /// Digest given directly as hex
    Hex(&'a str),
    /// File holding the serialized proof; its digest is computed here
    File(&'a str),
}

impl ProofSource<'_> {
    pub fn digest(&self) -> Result<Digest> {
        match self {
            ProofSource::Hex(value) => parse_digest(value),
            ProofSource::File(path) => {
                let bytes = fs::read(path).with_context(|| format!("cannot read proof {path}"))?;
                Ok(proof_digest(&bytes))
            }
        }
    }
}

pub fn verify(
    ledger: &Ledger,
    caller: &Principal,
    subject: &str,
    type_id: u64,
    proof: ProofSource<'_>,
    valid_for: Height,
) -> Result<()> {
    let digest = proof.digest()?;
    let valid_until = ledger.height().saturating_add(valid_for);

    ledger.registry.verify_attestation(
        caller,
        Principal::new(subject),
        CredentialTypeId(type_id),
        digest.clone(),
        valid_until,
    )?;

    println!("{}", style("✓ Attestation recorded").green().bold());
    println!("  Subject:      {}", style(subject).cyan());
    println!("  Type:         {}", type_id);
    println!("  Proof:        {}", style(&digest).yellow());
    println!("  Valid until:  {}", valid_until);
    Ok(())
}

pub fn revoke(ledger: &Ledger, caller: &Principal, subject: &str, type_id: u64) -> Result<()> {
    ledger
        .registry
        .revoke_attestation(caller, &Principal::new(subject), CredentialTypeId(type_id))?;

    println!("{}", style("✓ Attestation revoked").green().bold());
    Ok(())
}

pub fn check(ledger: &Ledger, subject: &str, type_id: u64) -> Result<()> {
    let subject = Principal::new(subject);
    let type_id = CredentialTypeId(type_id);
    let state = ledger.registry.attestation_state(&subject, type_id)?;

    println!("\n{}", style("Attestation").bold().underlined());
    println!("  Subject:  {}", style(&subject).cyan());
    println!("  Type:     {}", type_id);
    println!("  Height:   {}", ledger.height());
    println!("  Valid:    {}", yes_no(ledger.registry.is_valid(&subject, type_id)?));
    println!("  Revoked:  {}", yes_no(ledger.registry.is_revoked(&subject, type_id)?));
    println!(
        "  State:    {}",
        match state {
            AttestationState::Active => style("active").green(),
            AttestationState::Expired => style("expired").yellow(),
            AttestationState::Revoked => style("revoked").red(),
            AttestationState::Missing => style("never attested").dim(),
        }
    );

    if let Some(att) = ledger.registry.get_attestation(&subject, type_id)? {
        println!("  Issuer:   {}", att.issuer);
        println!("  Window:   {}..{}", att.issued_at, att.valid_until);
        println!("  Proof:    {}", att.proof_digest);
    }
    Ok(())
}

pub fn batch(ledger: &Ledger, subject: &str, ids: &[u64]) -> Result<()> {
    if ids.is_empty() {
        bail!("Provide at least one credential type id");
    }
    let results = ledger
        .registry
        .batch_check(&Principal::new(subject), &type_ids(ids))?;

    println!("\n{}", style("Batch Check").bold().underlined());
    for (id, valid) in ids.iter().zip(&results) {
        println!("  Type {:<6} {}", id, yes_no(*valid));
    }
    println!();
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}
