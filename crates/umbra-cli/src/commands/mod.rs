//! CLI command implementations

pub mod anchor;
pub mod attest;
pub mod challenge;
pub mod credential_type;
pub mod issuer;
pub mod status;

use anyhow::{Context, Result};
use console::style;
use umbra_core::{CredentialTypeId, Digest};
use umbra_registry::EventRecord;

/// Parse a hex digest argument
pub fn parse_digest(value: &str) -> Result<Digest> {
    Digest::from_hex(value).with_context(|| format!("invalid digest {value:?}"))
}

pub fn type_ids(ids: &[u64]) -> Vec<CredentialTypeId> {
    ids.iter().copied().map(CredentialTypeId).collect()
}

/// Print the events an invocation emitted
pub fn print_events(events: &[EventRecord]) {
    for record in events {
        println!(
            "  {} {}",
            style("event").dim(),
            style(record.event.name()).magenta()
        );
    }
}

pub fn yes_no(value: bool) -> console::StyledObject<&'static str> {
    if value {
        style("yes").green()
    } else {
        style("no").red()
    }
}
