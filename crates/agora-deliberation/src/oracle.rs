//! The deliberation oracle seam.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors surfaced by oracle calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// No oracle is configured or the backend is unreachable.
    #[error("deliberation oracle unavailable")]
    Unavailable,

    /// The per-call deadline elapsed.
    #[error("deliberation oracle call timed out")]
    Timeout,

    /// The backend failed mid-call.
    #[error("deliberation oracle transport error: {0}")]
    Transport(String),
}

/// The opaque capability that turns a prompt into free-form structured text.
///
/// Responses are expected, but not guaranteed, to be valid JSON in the shape
/// the orchestrator asked for; callers parse defensively and degrade.
#[async_trait]
pub trait DeliberationOracle: Send + Sync {
    /// Asks the oracle for one response.
    async fn ask(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Oracle used when no backend is configured; every call is unavailable,
/// which downstream treats as a degraded (non-blocking) round.
#[derive(Debug, Default)]
pub struct UnsetOracle;

#[async_trait]
impl DeliberationOracle for UnsetOracle {
    async fn ask(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable)
    }
}

/// Oracle fed from a fixed queue of responses, for tests and offline runs.
///
/// Each call pops the next queued item; an exhausted queue answers
/// [`OracleError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
}

impl ScriptedOracle {
    /// Creates an empty scripted oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn push(&self, response: impl Into<String>) {
        self.responses.lock().push_back(Ok(response.into()));
    }

    /// Queues a failing call.
    pub fn push_error(&self, error: OracleError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Remaining queued responses.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl DeliberationOracle for ScriptedOracle {
    async fn ask(&self, _prompt: &str) -> Result<String, OracleError> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(OracleError::Unavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unset_oracle_is_unavailable() {
        let oracle = UnsetOracle;
        assert_eq!(oracle.ask("hi").await, Err(OracleError::Unavailable));
    }

    #[tokio::test]
    async fn test_scripted_oracle_pops_in_order() {
        let oracle = ScriptedOracle::new();
        oracle.push("first");
        oracle.push_error(OracleError::Transport("boom".into()));
        oracle.push("second");

        assert_eq!(oracle.ask("p").await.unwrap(), "first");
        assert!(matches!(oracle.ask("p").await, Err(OracleError::Transport(_))));
        assert_eq!(oracle.ask("p").await.unwrap(), "second");
        assert_eq!(oracle.ask("p").await, Err(OracleError::Unavailable));
    }
}
