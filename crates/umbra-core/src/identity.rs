//! Caller identities and clock heights

use serde::{Deserialize, Serialize};

/// Clock height, the registry's only notion of time
pub type Height = u64;

/// An authenticated identity supplied by the host for each call.
///
/// The same type names the registry owner, issuers, subjects and challenge
/// requesters. The registry trusts it completely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
