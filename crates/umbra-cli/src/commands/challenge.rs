//! Proof-of-possession challenge commands
//!
//! `respond` only consumes the nonce; no signature is checked.

use anyhow::Result;
use console::style;
use umbra_core::{ChallengeNonce, Principal};
use umbra_crypto::{challenge_digest, random_digest};

use super::parse_digest;
use crate::ledger::Ledger;

pub fn create(
    ledger: &Ledger,
    caller: &Principal,
    digest: Option<&str>,
    context: Option<&str>,
) -> Result<()> {
    let challenge = match (digest, context) {
        (Some(hex), _) => parse_digest(hex)?,
        (None, Some(context)) => challenge_digest(caller, context.as_bytes()),
        (None, None) => random_digest(),
    };

    let nonce = ledger.registry.create_challenge(caller, challenge.clone())?;
    let window = ledger.registry.config().challenge_window;

    println!("{}", style("✓ Challenge created").green().bold());
    println!("  Nonce:      {}", style(nonce).yellow());
    println!("  Challenge:  {}", challenge);
    println!("  Expires:    height {}", ledger.height().saturating_add(window));
    Ok(())
}

pub fn respond(ledger: &Ledger, caller: &Principal, nonce: u64, response: &str) -> Result<()> {
    let response = parse_digest(response)?;
    ledger
        .registry
        .respond_to_challenge(caller, ChallengeNonce(nonce), &response)?;

    println!("{}", style("✓ Challenge answered").green().bold());
    println!("  Nonce:  {}", nonce);
    Ok(())
}
