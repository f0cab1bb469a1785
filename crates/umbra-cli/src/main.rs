//! Umbra CLI
//!
//! Command-line interface for the Umbra attestation registry. State lives in
//! a JSON ledger file; every mutating command is applied and committed as a
//! single transaction.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use umbra_core::{Height, Principal};
use umbra_registry::RegistryConfig;

mod commands;
mod ledger;

use commands::attest::ProofSource;
use ledger::Ledger;

#[derive(Parser)]
#[command(name = "umbra")]
#[command(author, version, about = "Umbra: credential attestation registry", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ledger file
    #[arg(long, global = true, default_value = "umbra-ledger.json", env = "UMBRA_LEDGER")]
    ledger: String,

    /// Principal submitting the call
    #[arg(long, global = true, env = "UMBRA_CALLER")]
    caller: Option<String>,

    /// Advance the ledger clock to this height before running
    #[arg(long, global = true, env = "UMBRA_HEIGHT")]
    height: Option<Height>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new registry into the ledger file
    Init {
        /// Registry owner
        #[arg(short, long)]
        owner: String,
    },

    /// Manage issuers (owner only)
    Issuer {
        #[command(subcommand)]
        action: IssuerAction,
    },

    /// Credential type catalog
    Type {
        #[command(subcommand)]
        action: TypeAction,
    },

    /// Revocation anchors
    Anchor {
        #[command(subcommand)]
        action: AnchorAction,
    },

    /// Attestations
    Attest {
        #[command(subcommand)]
        action: AttestAction,
    },

    /// Proof-of-possession challenges
    Challenge {
        #[command(subcommand)]
        action: ChallengeAction,
    },

    /// Show deployment, counters and recent events
    Status {
        /// Number of recent events to list
        #[arg(short, long, default_value_t = 10)]
        recent: usize,
    },
}

#[derive(Subcommand)]
enum IssuerAction {
    /// Register a new issuer
    Register {
        /// Issuer principal
        identity: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Initial credential type ids (comma-separated)
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Vec<u64>,
    },

    /// Activate or deactivate an issuer
    Status {
        /// Issuer principal
        identity: String,

        /// Deactivate instead of activate
        #[arg(long)]
        deactivate: bool,
    },

    /// Authorize an issuer for another credential type
    AddType {
        /// Issuer principal
        identity: String,

        /// Credential type id
        #[arg(short = 't', long)]
        type_id: u64,
    },

    /// Show issuer details
    Show {
        /// Issuer principal
        identity: String,
    },
}

#[derive(Subcommand)]
enum TypeAction {
    /// Define a new credential type (active issuers)
    Issue {
        /// Type name
        #[arg(short, long)]
        name: String,

        /// Description
        #[arg(short, long)]
        description: String,
    },

    /// Show a credential type
    Show {
        /// Credential type id
        id: u64,
    },
}

#[derive(Subcommand)]
enum AnchorAction {
    /// Compute a revocation root from a JSON entries file
    Build {
        /// Entries file: [{"subject": "...", "proof": "<hex>"}]
        #[arg(short, long)]
        entries: String,

        /// Credential type id
        #[arg(short = 't', long)]
        type_id: u64,

        /// Tree depth
        #[arg(long, default_value_t = umbra_crypto::tree::MAX_DEPTH)]
        depth: usize,

        /// Also publish the root as the caller's anchor
        #[arg(long)]
        publish: bool,
    },

    /// Publish a revocation root
    Update {
        /// Credential type id
        #[arg(short = 't', long)]
        type_id: u64,

        /// Root digest (hex)
        #[arg(short, long)]
        root: String,
    },

    /// Show an issuer's anchor
    Show {
        /// Issuer principal
        issuer: String,

        /// Credential type id
        #[arg(short = 't', long)]
        type_id: u64,
    },
}

#[derive(Subcommand)]
enum AttestAction {
    /// Record an attestation for a subject
    Verify {
        /// Subject principal
        subject: String,

        /// Credential type id
        #[arg(short = 't', long)]
        type_id: u64,

        /// Proof digest (hex)
        #[arg(long, conflicts_with = "proof_file", required_unless_present = "proof_file")]
        proof: Option<String>,

        /// Proof file to hash instead of a digest
        #[arg(long)]
        proof_file: Option<String>,

        /// Validity in blocks from the current height
        #[arg(long)]
        valid_for: Height,
    },

    /// Revoke an attestation (original issuer only)
    Revoke {
        subject: String,

        #[arg(short = 't', long)]
        type_id: u64,
    },

    /// Show validity of one attestation
    Check {
        subject: String,

        #[arg(short = 't', long)]
        type_id: u64,
    },

    /// Check several credential types for one subject
    Batch {
        subject: String,

        /// Credential type ids (comma-separated)
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Vec<u64>,
    },
}

#[derive(Subcommand)]
enum ChallengeAction {
    /// Open a challenge
    Create {
        /// Challenge digest (hex)
        #[arg(long, conflicts_with = "context")]
        digest: Option<String>,

        /// Context string hashed into the challenge
        #[arg(long)]
        context: Option<String>,
    },

    /// Answer an open challenge
    Respond {
        /// Nonce returned by `challenge create`
        nonce: u64,

        /// Response digest (hex)
        #[arg(short, long)]
        response: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("umbra={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let caller = cli.caller.as_deref().map(Principal::new);
    let require_caller = || match &caller {
        Some(caller) => Ok(caller),
        None => bail!("This command needs --caller (or UMBRA_CALLER)"),
    };

    match cli.command {
        Commands::Init { owner } => {
            let height = cli.height.unwrap_or(0);
            let config = RegistryConfig::from_env();
            let ledger = Ledger::create(&cli.ledger, Principal::new(owner), height, config)?;
            let path = ledger.path().display().to_string();
            let events = ledger.commit()?;
            println!("{}", console::style("✓ Registry deployed").green().bold());
            println!("  Ledger:  {}", path);
            commands::print_events(&events);
        }

        Commands::Issuer { action } => {
            let ledger = Ledger::open(&cli.ledger, cli.height)?;
            match action {
                IssuerAction::Register {
                    identity,
                    name,
                    types,
                } => {
                    commands::issuer::register(&ledger, require_caller()?, &identity, &name, &types)?;
                    commands::print_events(&ledger.commit()?);
                }
                IssuerAction::Status {
                    identity,
                    deactivate,
                } => {
                    commands::issuer::set_status(&ledger, require_caller()?, &identity, !deactivate)?;
                    commands::print_events(&ledger.commit()?);
                }
                IssuerAction::AddType { identity, type_id } => {
                    commands::issuer::add_type(&ledger, require_caller()?, &identity, type_id)?;
                    commands::print_events(&ledger.commit()?);
                }
                IssuerAction::Show { identity } => {
                    commands::issuer::show(&ledger, &identity)?;
                }
            }
        }

        Commands::Type { action } => {
            let ledger = Ledger::open(&cli.ledger, cli.height)?;
            match action {
                TypeAction::Issue { name, description } => {
                    commands::credential_type::issue(&ledger, require_caller()?, &name, &description)?;
                    commands::print_events(&ledger.commit()?);
                }
                TypeAction::Show { id } => {
                    commands::credential_type::show(&ledger, id)?;
                }
            }
        }

        Commands::Anchor { action } => match action {
            AnchorAction::Build {
                entries,
                type_id,
                depth,
                publish,
            } => {
                let root = commands::anchor::build(&entries, type_id, depth)?;
                if publish {
                    let ledger = Ledger::open(&cli.ledger, cli.height)?;
                    commands::anchor::publish(&ledger, require_caller()?, type_id, root)?;
                    commands::print_events(&ledger.commit()?);
                }
            }
            AnchorAction::Update { type_id, root } => {
                let ledger = Ledger::open(&cli.ledger, cli.height)?;
                commands::anchor::update(&ledger, require_caller()?, type_id, &root)?;
                commands::print_events(&ledger.commit()?);
            }
            AnchorAction::Show { issuer, type_id } => {
                let ledger = Ledger::open(&cli.ledger, cli.height)?;
                commands::anchor::show(&ledger, &issuer, type_id)?;
            }
        },

        Commands::Attest { action } => {
            let ledger = Ledger::open(&cli.ledger, cli.height)?;
            match action {
                AttestAction::Verify {
                    subject,
                    type_id,
                    proof,
                    proof_file,
                    valid_for,
                } => {
                    let source = match (&proof, &proof_file) {
                        (Some(hex), _) => ProofSource::Hex(hex),
                        (None, Some(path)) => ProofSource::File(path),
                        (None, None) => bail!("Provide --proof or --proof-file"),
                    };
                    commands::attest::verify(
                        &ledger,
                        require_caller()?,
                        &subject,
                        type_id,
                        source,
                        valid_for,
                    )?;
                    commands::print_events(&ledger.commit()?);
                }
                AttestAction::Revoke { subject, type_id } => {
                    commands::attest::revoke(&ledger, require_caller()?, &subject, type_id)?;
                    commands::print_events(&ledger.commit()?);
                }
                AttestAction::Check { subject, type_id } => {
                    commands::attest::check(&ledger, &subject, type_id)?;
                }
                AttestAction::Batch { subject, types } => {
                    commands::attest::batch(&ledger, &subject, &types)?;
                }
            }
        }

        Commands::Challenge { action } => {
            let ledger = Ledger::open(&cli.ledger, cli.height)?;
            match action {
                ChallengeAction::Create { digest, context } => {
                    commands::challenge::create(
                        &ledger,
                        require_caller()?,
                        digest.as_deref(),
                        context.as_deref(),
                    )?;
                    commands::print_events(&ledger.commit()?);
                }
                ChallengeAction::Respond { nonce, response } => {
                    commands::challenge::respond(&ledger, require_caller()?, nonce, &response)?;
                    commands::print_events(&ledger.commit()?);
                }
            }
        }

        Commands::Status { recent } => {
            let ledger = Ledger::open(&cli.ledger, cli.height)?;
            commands::status::show(&ledger, recent)?;
        }
    }

    Ok(())
}
