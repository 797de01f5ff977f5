//! The consensus-parameter echo returned at genesis.
//!
//! These values are a fixed configuration echo, not a computation: the
//! engine asks once at Init and replicates them. Changing a constant here
//! is a consensus-breaking change for the chain.

use serde::{Deserialize, Serialize};

/// Block size and gas ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Maximum serialized block size in bytes.
    pub max_bytes: i64,
    /// Maximum gas per block; -1 disables gas accounting.
    pub max_gas: i64,
}

/// Evidence-retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceParams {
    /// Maximum age of evidence in blocks.
    pub max_age_num_blocks: i64,
    /// Maximum age of evidence in nanoseconds (48 hours).
    pub max_age_duration_ns: i64,
    /// Maximum total evidence bytes per block.
    pub max_bytes: i64,
}

/// Permitted validator key types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorParams {
    /// Accepted public-key type names.
    pub pub_key_types: Vec<String>,
}

/// Application protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionParams {
    /// Application version number.
    pub app: u64,
}

/// The full parameter set echoed to the engine at Init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Block ceilings.
    pub block: BlockParams,
    /// Evidence retention.
    pub evidence: EvidenceParams,
    /// Key-type allowlist.
    pub validator: ValidatorParams,
    /// App version.
    pub version: VersionParams,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            block: BlockParams {
                max_bytes: 22_020_096,
                max_gas: -1,
            },
            evidence: EvidenceParams {
                max_age_num_blocks: 100_000,
                max_age_duration_ns: 172_800_000_000_000,
                max_bytes: 1_048_576,
            },
            validator: ValidatorParams {
                pub_key_types: vec!["ed25519".to_string()],
            },
            version: VersionParams { app: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_is_stable() {
        let params = ConsensusParams::default();
        assert_eq!(params.block.max_bytes, 22_020_096);
        assert_eq!(params.block.max_gas, -1);
        assert_eq!(params.evidence.max_age_num_blocks, 100_000);
        assert_eq!(params.evidence.max_age_duration_ns, 172_800_000_000_000);
        assert_eq!(params.evidence.max_bytes, 1_048_576);
        assert_eq!(params.validator.pub_key_types, vec!["ed25519"]);
        assert_eq!(params.version.app, 1);
        assert_eq!(params, ConsensusParams::default());
    }
}
