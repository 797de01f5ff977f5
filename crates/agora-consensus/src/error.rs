//! Consensus-side error types.

use thiserror::Error;

/// Errors surfaced by the callback state machine.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Operation bytes did not decode to a well-formed operation.
    #[error("malformed operation bytes: {0}")]
    MalformedOperation(#[from] serde_json::Error),

    /// The genesis validator set repeats a public key.
    #[error("duplicate validator key in genesis set: {0}")]
    DuplicateGenesisKey(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ConsensusError>;
