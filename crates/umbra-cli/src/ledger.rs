//! JSON ledger file
//!
//! Each CLI invocation is one transaction: open the ledger, run a single
//! registry operation, then write the new image to a temporary file and
//! rename it over the old one. A failed operation never reaches the disk.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use umbra_core::{Height, Principal, RegistryError};
use umbra_registry::{
    Clock, EventLog, EventRecord, LedgerSnapshot, ManualClock, Registry, RegistryConfig,
};

#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    /// Highest clock height this ledger has seen
    height: Height,
    snapshot: LedgerSnapshot,
    events: Vec<EventRecord>,
}

/// An open ledger with a live registry
pub struct Ledger {
    path: PathBuf,
    clock: Arc<ManualClock>,
    events: Arc<EventLog>,
    history: Vec<EventRecord>,
    pub registry: Registry,
}

impl Ledger {
    /// Deploy a new registry into a ledger file that must not exist yet
    pub fn create(
        path: impl Into<PathBuf>,
        owner: Principal,
        height: Height,
        config: RegistryConfig,
    ) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Err(RegistryError::AlreadyInitialized)
                .with_context(|| format!("ledger {} already exists", path.display()));
        }

        let clock = Arc::new(ManualClock::new(height));
        let events = Arc::new(EventLog::new());
        let registry = Registry::initialize(config, owner, clock.clone(), events.clone())?;

        info!(path = %path.display(), height, "ledger created");

        Ok(Self {
            path,
            clock,
            events,
            history: Vec::new(),
            registry,
        })
    }

    /// Open an existing ledger, optionally advancing its clock to `height`
    pub fn open(path: impl Into<PathBuf>, height: Option<Height>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "cannot read ledger {} (run `umbra init` first)",
                path.display()
            )
        })?;
        let file: LedgerFile = serde_json::from_str(&content)
            .with_context(|| format!("ledger {} is corrupt", path.display()))?;

        let clock = Arc::new(ManualClock::new(file.height));
        if let Some(requested) = height {
            if requested < file.height {
                bail!(
                    "height {} is behind the ledger clock ({}); heights never move backwards",
                    requested,
                    file.height
                );
            }
            clock.set(requested);
        }

        let events = Arc::new(EventLog::new());
        let registry = Registry::restore(file.snapshot, clock.clone(), events.clone())?;

        debug!(path = %path.display(), height = clock.height(), "ledger opened");

        Ok(Self {
            path,
            clock,
            events,
            history: file.events,
            registry,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn height(&self) -> Height {
        self.clock.height()
    }

    /// Every event recorded before this invocation
    pub fn history(&self) -> &[EventRecord] {
        &self.history
    }

    /// Persist the registry and return the events emitted by this invocation
    pub fn commit(mut self) -> Result<Vec<EventRecord>> {
        let emitted = self.events.records();
        self.history.extend(emitted.iter().cloned());

        let file = LedgerFile {
            height: self.clock.height(),
            snapshot: self.registry.snapshot()?,
            events: self.history,
        };

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&file)?)
            .with_context(|| format!("cannot write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("cannot replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), events = emitted.len(), "ledger committed");

        Ok(emitted)
    }
}
