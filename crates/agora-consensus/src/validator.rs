//! Validator records and pending set updates.

use agora_types::PublicKeyBytes;
use serde::{Deserialize, Serialize};

/// One entry in the current validator set.
///
/// The set is held as an ordered `Vec` and kept unique by public key; the
/// merge preserves each record's position when its power changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    /// The validator's public key.
    pub pubkey: PublicKeyBytes,
    /// Voting power.
    pub power: i64,
}

impl ValidatorRecord {
    /// Creates a record.
    pub fn new(pubkey: PublicKeyBytes, power: i64) -> Self {
        Self { pubkey, power }
    }
}

/// A queued validator-set change, applied at the next finalize.
///
/// Reported back to the engine verbatim as part of the finalize delta, so
/// the replicated side can apply identical update semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUpdate {
    /// The affected public key.
    pub pubkey: PublicKeyBytes,
    /// The new voting power.
    pub power: i64,
}

impl PendingUpdate {
    /// Creates a pending update.
    pub fn new(pubkey: PublicKeyBytes, power: i64) -> Self {
        Self { pubkey, power }
    }
}
