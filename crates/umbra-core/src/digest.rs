//! Opaque digests
//!
//! Proof hashes, merkle roots and challenge digests are all carried as opaque
//! byte strings of at most 32 bytes. The registry only checks that they are
//! present; it never interprets their contents.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Maximum digest length in bytes
pub const MAX_DIGEST_LEN: usize = 32;

/// Opaque commitment of at most [`MAX_DIGEST_LEN`] bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_vec")] Vec<u8>);

impl Digest {
    /// Wrap raw bytes, rejecting anything longer than [`MAX_DIGEST_LEN`]
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_DIGEST_LEN {
            return Err(RegistryError::InvalidInput(format!(
                "digest is {} bytes, at most {} allowed",
                bytes.len(),
                MAX_DIGEST_LEN
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Parse a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)
            .map_err(|e| RegistryError::InvalidInput(format!("invalid hex digest: {e}")))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

mod hex_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() > super::MAX_DIGEST_LEN {
            return Err(serde::de::Error::custom("digest too long"));
        }
        Ok(bytes)
    }
}
