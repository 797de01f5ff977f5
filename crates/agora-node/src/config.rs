//! Node configuration types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one validator-agent process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Chain this agent deliberates on.
    pub chain_id: String,
    /// Directory holding transcripts and round counters.
    pub data_dir: String,
    /// Path of the persisted agent registry.
    pub registry_file: String,
    /// This validator's engine-side address (empty = unbound observer).
    pub validator_address: String,
    /// Per-call deliberation oracle timeout, seconds.
    pub oracle_timeout_secs: u64,
    /// Transcript tailer poll interval, milliseconds.
    pub poll_interval_ms: u64,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: "mainnet".to_string(),
            data_dir: "./data".to_string(),
            registry_file: "./data/agent_registry.json".to_string(),
            validator_address: String::new(),
            oracle_timeout_secs: 60,
            poll_interval_ms: 200,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file; a missing file yields defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_yaml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.chain_id, "mainnet");
        assert_eq!(config.oracle_timeout_secs, 60);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "chain_id: testnet\npoll_interval_ms: 50\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chain_id, "testnet");
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.log_level, "info");
    }
}
