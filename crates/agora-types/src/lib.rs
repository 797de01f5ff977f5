//! Common types used throughout Agora.
//!
//! Agora augments a BFT-replicated state machine with an AI-mediated
//! deliberation gate: before a validator votes on a proposed block, its
//! bound agent reviews every contained operation over multiple rounds.
//! This crate holds the data model shared by every other Agora crate:
//!
//! - [`Operation`]: the closed set of units of work carried in blocks
//! - [`Agent`]: a deliberating identity with free-form personality data
//! - [`Verdict`]: the structured judgment one deliberation round produces
//! - [`VoteEvent`]: the record published to live observers per transcript line
//! - [`PublicKeyBytes`]: opaque validator key material plus address derivation

mod agent;
mod event;
mod identity;
mod operation;
mod verdict;

pub use agent::Agent;
pub use event::VoteEvent;
pub use identity::{AgentId, ChainId, PublicKeyBytes};
pub use operation::{Operation, OperationKind};
pub use verdict::{DiscussionTake, LoanReview, PaperReview, Verdict};

/// Default voting power assigned to newly registered validators.
pub const DEFAULT_VALIDATOR_POWER: i64 = 1_000_000;
