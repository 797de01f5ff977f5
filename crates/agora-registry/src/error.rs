//! Error types for the registry module.

use thiserror::Error;

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Binding referenced an agent that is not registered on the chain.
    #[error("unknown agent {agent_id} on chain {chain}")]
    UnknownAgent {
        /// The chain the binding targeted.
        chain: String,
        /// The missing agent.
        agent_id: String,
    },

    /// Persistence file could not be read or written.
    #[error("registry persistence error at {path}: {source}")]
    Persistence {
        /// Path of the registry file.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Persistence file contents were not valid.
    #[error("corrupt registry file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
