//! Error types for Umbra
//!
//! Every registry operation returns either a value or one of these tagged
//! failures. A failed operation never leaves partial writes behind.

use thiserror::Error;

/// Main error type for registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid proof material")]
    InvalidProof,

    #[error("Capacity exceeded: at most {limit} entries allowed")]
    CapacityExceeded { limit: usize },

    #[error("Validity window already expired")]
    ExpiredWindow,

    #[error("Validity window too long: span must be below {max}")]
    WindowTooLong { max: u64 },

    #[error("Challenge nonce already used")]
    AlreadyUsed,

    #[error("Challenge expired")]
    Stale,

    #[error("Registry already initialized")]
    AlreadyInitialized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RegistryError {
    /// Stable numeric result code for hosts that transport failures as integers.
    pub fn code(&self) -> u32 {
        match self {
            RegistryError::Unauthorized => 100,
            RegistryError::NotFound(_) => 101,
            RegistryError::AlreadyExists(_) => 102,
            RegistryError::InvalidInput(_) => 103,
            RegistryError::InvalidProof => 104,
            RegistryError::CapacityExceeded { .. } => 105,
            RegistryError::ExpiredWindow => 106,
            RegistryError::WindowTooLong { .. } => 107,
            RegistryError::AlreadyUsed => 108,
            RegistryError::Stale => 109,
            RegistryError::AlreadyInitialized => 110,
            RegistryError::Storage(_) => 500,
            RegistryError::Serialization(_) => 501,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
