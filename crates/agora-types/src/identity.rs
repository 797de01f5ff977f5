//! Identifiers shared across Agora crates.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of a chain (one deliberation transcript per chain).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub String);

impl ChainId {
    /// Creates a chain id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    /// Creates an agent id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque validator public key (hex-encoded bytes).
///
/// Agora never verifies signatures; keys are identity material handed to the
/// external replication engine. Equality is byte equality of the encoded key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyBytes(pub String);

impl PublicKeyBytes {
    /// Creates from raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Creates from a hex string.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Returns the hex string as a reference.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Decodes the raw key bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.0)
    }

    /// Derives the engine-side validator address: uppercase hex of the
    /// first 20 bytes of SHA-256 over the raw key bytes.
    pub fn address(&self) -> Result<String, hex::FromHexError> {
        let bytes = self.to_bytes()?;
        let digest = Sha256::digest(&bytes);
        Ok(hex::encode_upper(&digest[..20]))
    }
}

impl std::fmt::Display for PublicKeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_roundtrip() {
        let key = PublicKeyBytes::from_bytes(&[1, 2, 3, 4]);
        assert_eq!(key.as_hex(), "01020304");
        assert_eq!(key.to_bytes().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_address_is_stable_and_short() {
        let key = PublicKeyBytes::from_bytes(&[0u8; 32]);
        let addr = key.address().unwrap();
        // 20 bytes, uppercase hex
        assert_eq!(addr.len(), 40);
        assert_eq!(addr, addr.to_uppercase());
        assert_eq!(addr, key.address().unwrap());
    }

    #[test]
    fn test_address_rejects_bad_hex() {
        let key = PublicKeyBytes::from_hex("not-hex");
        assert!(key.address().is_err());
    }

    #[test]
    fn test_chain_id_display() {
        let chain = ChainId::new("mainnet");
        assert_eq!(chain.to_string(), "mainnet");
        assert_eq!(chain.as_str(), "mainnet");
    }
}
