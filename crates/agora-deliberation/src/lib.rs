//! Multi-round deliberation for Agora.
//!
//! Given an agent and a proposed operation, the [`Orchestrator`] runs a
//! fixed number of discussion rounds against the chain's shared transcript
//! and then one binding round whose verdict is returned to the caller:
//!
//! - paper submissions: 3 discussion rounds + 1 binding round
//! - loan requests: 4 discussion rounds + 1 binding round
//! - generic discussions: 1 round, immediately binding
//!
//! Every round reads the full transcript so far, asks the oracle, and
//! appends one line, including the binding round, so observers see the
//! final stance too. The oracle is an opaque, possibly-failing capability
//! behind [`DeliberationOracle`]; a failed, timed-out, or unparseable call
//! degrades that single round to the kind's default verdict and the
//! orchestrator keeps going. Nothing here retries, and nothing here can
//! halt block production.

mod oracle;
mod orchestrator;
mod prompt;

pub use oracle::{DeliberationOracle, OracleError, ScriptedOracle, UnsetOracle};
pub use orchestrator::{
    Deliberation, DegradeReason, Orchestrator, OrchestratorConfig, RoundOutcome,
};
