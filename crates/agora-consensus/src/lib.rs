//! The application side of the block lifecycle.
//!
//! An external BFT engine drives consensus; this crate implements the
//! callbacks it invokes, in a fixed cycle per block height:
//!
//! ```text
//! Init (once) -> AdmissionCheck* -> ProposeSelect -> ProposalValidate
//!             -> Execute* -> Finalize -> Commit
//! ```
//!
//! [`DeliberativeApp`] is the state machine behind those callbacks. The
//! interesting phase is proposal validation, where the validator's bound
//! agent deliberates every operation in the batch and a single authoritative
//! negative verdict rejects the whole proposal. Everything else is plumbing:
//! structural admission, includability filtering, the pure validator-set
//! merge, and a consensus-parameter echo.

mod app;
mod error;
mod merge;
mod params;
mod validator;

pub use app::{DeliberativeApp, ExecOutcome, ProposalDecision};
pub use error::{ConsensusError, Result};
pub use merge::merge_validator_updates;
pub use params::{BlockParams, ConsensusParams, EvidenceParams, ValidatorParams, VersionParams};
pub use validator::{PendingUpdate, ValidatorRecord};
