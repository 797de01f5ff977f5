//! Registry trait and the file-backed implementation.

use crate::error::{RegistryError, Result};
use agora_types::{Agent, AgentId, ChainId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Lookup and binding surface consumed by the callback state machine.
pub trait Registry: Send + Sync {
    /// Registers (or re-registers) an agent on a chain.
    fn register_agent(&self, chain: &ChainId, agent: Agent) -> Result<()>;

    /// Binds an agent to a validator address on a chain.
    ///
    /// The agent must already be registered; rebinding an address overwrites
    /// the previous binding (last write wins). The bound agent is marked as
    /// a validator.
    fn bind_validator(&self, chain: &ChainId, agent_id: &AgentId, validator_addr: &str)
        -> Result<()>;

    /// Looks up the agent bound to a validator address, if any.
    fn agent_by_validator(&self, chain: &ChainId, validator_addr: &str) -> Option<Agent>;

    /// Lists all agents registered on a chain.
    fn list_agents(&self, chain: &ChainId) -> Vec<Agent>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryState {
    /// chain -> agent id -> agent.
    agents: HashMap<ChainId, HashMap<AgentId, Agent>>,
    /// chain -> validator address -> agent id.
    validator_map: HashMap<ChainId, HashMap<String, AgentId>>,
}

/// Lock-guarded agent registry with optional JSON persistence.
///
/// Mutations are serialized through the write lock; when a persistence path
/// is configured, every mutation is flushed to it before the lock is
/// released. A failed flush is logged and the in-memory state stands; the
/// registry prefers availability over durable consistency, matching the
/// rest of the failure policy.
#[derive(Debug)]
pub struct AgentRegistry {
    state: RwLock<RegistryState>,
    persist_path: Option<PathBuf>,
}

impl AgentRegistry {
    /// Creates an empty in-memory registry (used by tests and tools).
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            persist_path: None,
        }
    }

    /// Opens a registry persisted at `path`, loading existing state if the
    /// file is present and well-formed. A corrupt file is an error; a
    /// missing one starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RegistryState::default(),
            Err(e) => {
                return Err(RegistryError::Persistence {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let agent_count: usize = state.agents.values().map(|m| m.len()).sum();
        info!(path = %path.display(), agents = agent_count, "registry opened");

        Ok(Self {
            state: RwLock::new(state),
            persist_path: Some(path),
        })
    }

    fn flush(&self, state: &RegistryState) {
        let Some(path) = self.persist_path.as_deref() else {
            return;
        };
        if let Err(e) = write_state(path, state) {
            warn!(path = %path.display(), error = %e, "failed to persist registry");
        }
    }
}

fn write_state(path: &Path, state: &RegistryState) -> Result<()> {
    let data = serde_json::to_vec_pretty(state)?;
    std::fs::write(path, data).map_err(|e| RegistryError::Persistence {
        path: path.display().to_string(),
        source: e,
    })
}

impl Registry for AgentRegistry {
    fn register_agent(&self, chain: &ChainId, agent: Agent) -> Result<()> {
        let mut state = self.state.write();
        state
            .agents
            .entry(chain.clone())
            .or_default()
            .insert(agent.id.clone(), agent);
        self.flush(&state);
        Ok(())
    }

    fn bind_validator(
        &self,
        chain: &ChainId,
        agent_id: &AgentId,
        validator_addr: &str,
    ) -> Result<()> {
        let mut state = self.state.write();

        // The binding invariant: the address map may only reference agents
        // that exist on the same chain.
        let Some(agent) = state
            .agents
            .get_mut(chain)
            .and_then(|agents| agents.get_mut(agent_id))
        else {
            return Err(RegistryError::UnknownAgent {
                chain: chain.to_string(),
                agent_id: agent_id.to_string(),
            });
        };

        agent.is_validator = true;
        agent.validator_address = Some(validator_addr.to_string());

        state
            .validator_map
            .entry(chain.clone())
            .or_default()
            .insert(validator_addr.to_string(), agent_id.clone());

        self.flush(&state);
        info!(chain = %chain, agent = %agent_id, validator = validator_addr, "agent bound to validator");
        Ok(())
    }

    fn agent_by_validator(&self, chain: &ChainId, validator_addr: &str) -> Option<Agent> {
        let state = self.state.read();
        let agent_id = state.validator_map.get(chain)?.get(validator_addr)?;
        state.agents.get(chain)?.get(agent_id).cloned()
    }

    fn list_agents(&self, chain: &ChainId) -> Vec<Agent> {
        self.state
            .read()
            .agents
            .get(chain)
            .map(|agents| agents.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, name: &str) -> Agent {
        Agent::new(AgentId::new(id), name, "validator")
    }

    #[test]
    fn test_register_and_list() {
        let registry = AgentRegistry::in_memory();
        let chain = ChainId::new("mainnet");

        registry.register_agent(&chain, agent("a-1", "Ada")).unwrap();
        registry.register_agent(&chain, agent("a-2", "Bob")).unwrap();

        let mut names: Vec<_> = registry
            .list_agents(&chain)
            .into_iter()
            .map(|a| a.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Ada", "Bob"]);
        assert!(registry.list_agents(&ChainId::new("testnet")).is_empty());
    }

    #[test]
    fn test_bind_requires_existing_agent() {
        let registry = AgentRegistry::in_memory();
        let chain = ChainId::new("mainnet");

        let err = registry
            .bind_validator(&chain, &AgentId::new("ghost"), "ADDR")
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownAgent { .. }));
    }

    #[test]
    fn test_bind_marks_agent_and_resolves() {
        let registry = AgentRegistry::in_memory();
        let chain = ChainId::new("mainnet");

        registry.register_agent(&chain, agent("a-1", "Ada")).unwrap();
        registry
            .bind_validator(&chain, &AgentId::new("a-1"), "ADDR")
            .unwrap();

        let bound = registry.agent_by_validator(&chain, "ADDR").unwrap();
        assert_eq!(bound.name, "Ada");
        assert!(bound.is_validator);
        assert_eq!(bound.validator_address.as_deref(), Some("ADDR"));

        assert!(registry.agent_by_validator(&chain, "OTHER").is_none());
    }

    #[test]
    fn test_rebind_overwrites() {
        let registry = AgentRegistry::in_memory();
        let chain = ChainId::new("mainnet");

        registry.register_agent(&chain, agent("a-1", "Ada")).unwrap();
        registry.register_agent(&chain, agent("a-2", "Bob")).unwrap();

        registry
            .bind_validator(&chain, &AgentId::new("a-1"), "ADDR")
            .unwrap();
        registry
            .bind_validator(&chain, &AgentId::new("a-2"), "ADDR")
            .unwrap();

        assert_eq!(registry.agent_by_validator(&chain, "ADDR").unwrap().name, "Bob");
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("agent_registry.json");
        let chain = ChainId::new("mainnet");

        {
            let registry = AgentRegistry::open(&path).unwrap();
            registry.register_agent(&chain, agent("a-1", "Ada")).unwrap();
            registry
                .bind_validator(&chain, &AgentId::new("a-1"), "ADDR")
                .unwrap();
        }

        let reopened = AgentRegistry::open(&path).unwrap();
        assert_eq!(
            reopened.agent_by_validator(&chain, "ADDR").unwrap().name,
            "Ada"
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("agent_registry.json");
        std::fs::write(&path, b"{{{").unwrap();

        assert!(AgentRegistry::open(&path).is_err());
    }
}
