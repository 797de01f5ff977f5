//! Agent registry for Agora chains.
//!
//! Each chain has a set of registered agents and a map from validator
//! address to the agent that deliberates for it. Binding is the only writer
//! of that map and maintains its invariant: every bound address references
//! an agent that exists on the same chain.
//!
//! The registry is an explicitly constructed, dependency-injected component
//! behind the [`Registry`] trait, so the callback state machine can be
//! tested against an in-memory instance. Reads take only a lock; no
//! network or oracle I/O ever happens under it.

mod error;
mod registry;

pub use error::{RegistryError, Result};
pub use registry::{AgentRegistry, Registry};
