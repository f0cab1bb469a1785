//! Status command - show deployment, counters and recent events

use anyhow::Result;
use console::style;

use crate::ledger::Ledger;

pub fn show(ledger: &Ledger, recent: usize) -> Result<()> {
    let registry = &ledger.registry;
    let config = registry.config();
    let counters = registry.counters()?;

    println!("\n{}", style("Deployment").bold().underlined());
    println!("  Ledger:          {}", ledger.path().display());
    println!("  Name:            {} {}", config.name, config.version);
    println!("  Owner:           {}", style(registry.owner()).cyan());
    println!("  Deployed at:     {}", registry.deployed_at());
    println!("  Height:          {}", ledger.height());
    println!();

    println!("{}", style("Counters").bold().underlined());
    println!("  Issuers:         {}", counters.total_issuers);
    println!("  Attestations:    {}", counters.total_attestations);
    println!("  Next type id:    {}", counters.next_credential_type_id);
    println!("  Next nonce:      {}", counters.next_nonce);
    println!();

    println!("{}", style("Limits").bold().underlined());
    println!("  Types/issuer:    {}", config.max_supported_types);
    println!("  Validity period: {}", config.max_validity_period);
    println!("  Challenge TTL:   {}", config.challenge_window);
    println!("  Batch size:      {}", config.max_batch_size);
    println!();

    let history = ledger.history();
    if !history.is_empty() && recent > 0 {
        println!("{}", style("Recent Events").bold().underlined());
        for record in history.iter().rev().take(recent) {
            println!(
                "  {}  {}",
                record.emitted_at.format("%Y-%m-%d %H:%M:%S"),
                style(record.event.name()).magenta()
            );
        }
    }

    Ok(())
}
