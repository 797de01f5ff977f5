//! Deliberating agents.

use crate::identity::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An AI agent registered on a chain.
///
/// Agents are owned by the registry; the orchestrator and the callback state
/// machine receive them by value and never mutate them. The attribute map is
/// free-form personality data (traits, style, influences) used only to build
/// oracle prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,

    /// Display name, as rendered into transcript lines. Must not contain `|`.
    pub name: String,

    /// Role label (e.g. "validator", "observer").
    pub role: String,

    /// Address of the validator this agent deliberates for, once bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_address: Option<String>,

    /// Whether the agent is bound to a validator and deliberates.
    #[serde(default)]
    pub is_validator: bool,

    /// Open personality attributes, keyed by trait name.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Agent {
    /// Creates a new, unbound agent.
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            validator_address: None,
            is_validator: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds a personality attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Marks the agent as bound to a validator address.
    pub fn with_validator_address(mut self, addr: impl Into<String>) -> Self {
        self.validator_address = Some(addr.into());
        self.is_validator = true;
        self
    }

    /// Returns the display name with any `|` characters removed, safe for
    /// embedding in a transcript line.
    pub fn transcript_name(&self) -> String {
        self.name.replace('|', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_builder() {
        let agent = Agent::new(AgentId::new("a-1"), "Ada", "validator")
            .with_attribute("traits", serde_json::json!(["curious", "rigorous"]))
            .with_validator_address("ABCDEF");

        assert!(agent.is_validator);
        assert_eq!(agent.validator_address.as_deref(), Some("ABCDEF"));
        assert_eq!(agent.attributes.len(), 1);
    }

    #[test]
    fn test_transcript_name_strips_pipes() {
        let agent = Agent::new(AgentId::new("a-1"), "A|da", "validator");
        assert_eq!(agent.transcript_name(), "Ada");
    }
}
