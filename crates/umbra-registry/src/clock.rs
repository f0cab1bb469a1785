//! Clock collaborator
//!
//! The host advances the clock; the registry only reads it.

use std::sync::atomic::{AtomicU64, Ordering};
use umbra_core::Height;

/// Source of the monotonically non-decreasing clock height
pub trait Clock: Send + Sync {
    /// Current height
    fn height(&self) -> Height;

    /// Height recorded on revocation anchors. Hosts that anchor against a
    /// separate settlement chain report that chain's height here.
    fn anchor_height(&self) -> Height {
        self.height()
    }
}

/// Clock advanced explicitly by the host (and by tests)
#[derive(Debug, Default)]
pub struct ManualClock {
    height: AtomicU64,
}

impl ManualClock {
    pub fn new(height: Height) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Move forward by `by` heights and return the new height
    pub fn advance(&self, by: u64) -> Height {
        self.height.fetch_add(by, Ordering::SeqCst) + by
    }

    /// Jump to `height`. Requests to move backwards are ignored.
    pub fn set(&self, height: Height) -> Height {
        self.height.fetch_max(height, Ordering::SeqCst).max(height)
    }
}

impl Clock for ManualClock {
    fn height(&self) -> Height {
        self.height.load(Ordering::SeqCst)
    }
}
