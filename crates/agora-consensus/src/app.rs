//! The callback state machine driven by the external engine.

use crate::error::{ConsensusError, Result};
use crate::merge::merge_validator_updates;
use crate::params::ConsensusParams;
use crate::validator::{PendingUpdate, ValidatorRecord};
use agora_deliberation::{Orchestrator, RoundOutcome};
use agora_registry::Registry;
use agora_types::{ChainId, Operation, OperationKind, PublicKeyBytes, DEFAULT_VALIDATOR_POWER};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The batch-level decision returned from proposal validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalDecision {
    /// Every deliberated operation passed (or nothing was deliberated).
    Accept,
    /// At least one operation drew an authoritative negative verdict.
    Reject,
}

/// The outcome of applying one committed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The operation was applied.
    Applied {
        /// Kind of the applied operation.
        kind: OperationKind,
        /// Human-readable result line.
        info: String,
    },
    /// The operation bytes were malformed; non-fatal, the block continues.
    Rejected {
        /// Why the operation was not applied.
        reason: String,
    },
}

#[derive(Debug, Default)]
struct AppState {
    validators: Vec<ValidatorRecord>,
    pending: Vec<PendingUpdate>,
    /// Height and delta of the most recent finalize. The engine only ever
    /// retries the current phase, so one cached delta is enough for retries
    /// to see the identical result without re-merging.
    last_finalized: Option<(i64, Vec<PendingUpdate>)>,
}

/// One validator agent's application state machine.
///
/// The engine invokes a fixed cycle per block height: init once at genesis,
/// admission checks against the pending pool at any time, then per block
/// propose-select (leader), proposal-validate (everyone), execute per
/// committed operation, finalize, commit. Each agent process owns its own
/// instance; agents coordinate only through the engine's ordering and the
/// shared transcript file.
pub struct DeliberativeApp {
    chain: ChainId,
    /// This validator's engine-side address, used to find the bound agent.
    self_address: String,
    registry: Arc<dyn Registry>,
    orchestrator: Orchestrator,
    state: Mutex<AppState>,
}

impl DeliberativeApp {
    /// Creates the state machine for one validator process.
    pub fn new(
        chain: ChainId,
        self_address: impl Into<String>,
        registry: Arc<dyn Registry>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            chain,
            self_address: self_address.into(),
            registry,
            orchestrator,
            state: Mutex::new(AppState::default()),
        }
    }

    /// Genesis: stores the initial validator set and echoes the fixed
    /// consensus parameters. The genesis set must be unique by key.
    pub fn init(
        &self,
        genesis: Vec<ValidatorRecord>,
    ) -> Result<(Vec<ValidatorRecord>, ConsensusParams)> {
        let mut seen = HashSet::new();
        for record in &genesis {
            if !seen.insert(&record.pubkey) {
                return Err(ConsensusError::DuplicateGenesisKey(
                    record.pubkey.to_string(),
                ));
            }
        }

        info!(chain = %self.chain, validators = genesis.len(), "chain initialized");
        self.state.lock().validators = genesis.clone();
        Ok((genesis, ConsensusParams::default()))
    }

    /// Admission check: structural validation only. Semantic rejection is
    /// deferred to proposal validation, where deliberation is affordable.
    pub fn check_operation(&self, bytes: &[u8]) -> bool {
        Operation::from_bytes(bytes).is_ok()
    }

    /// Leader-side selection: keeps includable candidates, order preserved.
    /// Malformed entries do not make the cut; they are dropped, not failed.
    pub fn propose_select(&self, candidates: &[Vec<u8>]) -> Vec<Vec<u8>> {
        candidates
            .iter()
            .filter(|bytes| {
                Operation::from_bytes(bytes)
                    .map(|op| op.is_includable())
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Validates a proposed batch by deliberating every operation through
    /// the bound agent.
    ///
    /// An unbound validator accepts immediately and never blocks consensus.
    /// The batch is rejected if any operation draws an authoritative
    /// negative verdict; a degraded or failed binding round is a
    /// non-blocking default and never vetoes on its own. Every deliberation
    /// round lands in the transcript regardless of the decision.
    pub async fn proposal_validate(&self, operations: &[Vec<u8>]) -> ProposalDecision {
        let Some(agent) = self.registry.agent_by_validator(&self.chain, &self.self_address)
        else {
            debug!(chain = %self.chain, validator = %self.self_address, "no bound agent, accepting");
            return ProposalDecision::Accept;
        };

        let mut reject = false;
        for bytes in operations {
            let op = match Operation::from_bytes(bytes) {
                Ok(op) => op,
                Err(e) => {
                    warn!(chain = %self.chain, error = %e, "skipping malformed operation in proposal");
                    continue;
                }
            };

            let deliberation = self.orchestrator.deliberate(&agent, &op, &self.chain).await;
            if let Some(RoundOutcome::Verdict(v)) = deliberation.rounds.last() {
                if !v.disposition() {
                    info!(
                        chain = %self.chain,
                        agent = %agent.name,
                        kind = %op.kind(),
                        "negative verdict, rejecting proposal"
                    );
                    reject = true;
                }
            }
        }

        if reject {
            ProposalDecision::Reject
        } else {
            ProposalDecision::Accept
        }
    }

    /// Applies one committed operation.
    ///
    /// Registrations queue a validator-set update at the default power;
    /// deliberated kinds need no further state change here (their effect is
    /// the transcript itself) and simply acknowledge.
    pub fn execute_operation(&self, bytes: &[u8]) -> ExecOutcome {
        let op = match Operation::from_bytes(bytes) {
            Ok(op) => op,
            Err(e) => {
                warn!(chain = %self.chain, error = %e, "refusing malformed committed operation");
                return ExecOutcome::Rejected {
                    reason: format!("malformed operation bytes: {e}"),
                };
            }
        };

        let kind = op.kind();
        let info = match op {
            Operation::ValidatorRegistration { originator, pubkey } => {
                let queued = self.register_validator(pubkey.clone(), DEFAULT_VALIDATOR_POWER);
                if queued {
                    format!("validator registration queued by {originator}")
                } else {
                    format!("validator {pubkey} already registered")
                }
            }
            Operation::PaperSubmission { title, author, .. } => {
                format!("paper '{title}' by {author} recorded")
            }
            Operation::LoanRequest { originator, .. } => {
                format!("loan request by {originator} recorded")
            }
            Operation::GenericDiscussion { originator, .. } => {
                format!("discussion opened by {originator}")
            }
        };

        debug!(chain = %self.chain, kind = %kind, info = %info, "operation executed");
        ExecOutcome::Applied { kind, info }
    }

    /// Queues a validator addition for the next finalize. Idempotent: a key
    /// already present in the current set or already queued produces no
    /// second update and is not an error. Returns whether an update was
    /// queued.
    pub fn register_validator(&self, pubkey: PublicKeyBytes, power: i64) -> bool {
        let mut state = self.state.lock();

        if state.validators.iter().any(|r| r.pubkey == pubkey)
            || state.pending.iter().any(|u| u.pubkey == pubkey)
        {
            debug!(chain = %self.chain, validator = %pubkey, "duplicate registration ignored");
            return false;
        }

        info!(chain = %self.chain, validator = %pubkey, power, "validator registration queued");
        state.pending.push(PendingUpdate::new(pubkey, power));
        true
    }

    /// Merges pending updates into the current set and returns the delta to
    /// report. Idempotent per height: a retry of the most recent height
    /// returns the cached delta without merging again. No pending updates
    /// means an empty delta.
    pub fn finalize(&self, height: i64) -> Vec<PendingUpdate> {
        let mut state = self.state.lock();

        if let Some((done, delta)) = &state.last_finalized {
            if *done == height {
                debug!(chain = %self.chain, height, "finalize retry, returning cached delta");
                return delta.clone();
            }
        }

        let pending = std::mem::take(&mut state.pending);
        let (merged, delta) = merge_validator_updates(&state.validators, &pending);

        if !delta.is_empty() {
            info!(chain = %self.chain, height, updates = delta.len(), "validator set updated");
        }
        state.validators = merged;
        state.last_finalized = Some((height, delta.clone()));
        delta
    }

    /// Synchronization point; all durable state is the engine's.
    pub fn commit(&self) {
        debug!(chain = %self.chain, "block committed");
    }

    /// The current validator set (a snapshot).
    pub fn validators(&self) -> Vec<ValidatorRecord> {
        self.state.lock().validators.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_deliberation::{OrchestratorConfig, UnsetOracle};
    use agora_registry::AgentRegistry;
    use agora_transcript::TranscriptStore;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> DeliberativeApp {
        let store = TranscriptStore::new(dir.path()).unwrap();
        let orchestrator = Orchestrator::new(
            Arc::new(UnsetOracle),
            store,
            OrchestratorConfig::default(),
        );
        DeliberativeApp::new(
            ChainId::new("mainnet"),
            "SELFADDR",
            Arc::new(AgentRegistry::in_memory()),
            orchestrator,
        )
    }

    fn key(byte: u8) -> PublicKeyBytes {
        PublicKeyBytes::from_bytes(&[byte; 32])
    }

    #[test]
    fn test_init_rejects_duplicate_genesis_keys() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let genesis = vec![
            ValidatorRecord::new(key(1), 10),
            ValidatorRecord::new(key(1), 20),
        ];
        assert!(matches!(
            app.init(genesis),
            Err(ConsensusError::DuplicateGenesisKey(_))
        ));
    }

    #[test]
    fn test_admission_is_structural_only() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let op = Operation::GenericDiscussion {
            originator: "bob".into(),
            topic: String::new(),
        };
        // Empty topic fails includability but still passes admission.
        assert!(app.check_operation(&op.to_bytes()));
        assert!(!app.check_operation(b"not json"));
    }

    #[test]
    fn test_propose_select_filters_and_preserves_order() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let good_a = Operation::LoanRequest {
            originator: "bob".into(),
            details: "100 ETH".into(),
        }
        .to_bytes();
        let empty = Operation::GenericDiscussion {
            originator: "bob".into(),
            topic: String::new(),
        }
        .to_bytes();
        let good_b = Operation::ValidatorRegistration {
            originator: "carol".into(),
            pubkey: key(9),
        }
        .to_bytes();

        let selected = app.propose_select(&[
            good_a.clone(),
            b"garbage".to_vec(),
            empty,
            good_b.clone(),
        ]);
        assert_eq!(selected, vec![good_a, good_b]);
    }

    #[test]
    fn test_registration_idempotent_against_current_set() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        app.init(vec![ValidatorRecord::new(key(1), 10)]).unwrap();

        assert!(!app.register_validator(key(1), 50));
        assert!(app.register_validator(key(2), 50));
        assert_eq!(app.finalize(1).len(), 1);
    }

    #[test]
    fn test_registration_idempotent_against_pending_queue() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        app.init(vec![]).unwrap();

        // Same new key registered twice before the next finalize: exactly
        // one pending update, never two.
        assert!(app.register_validator(key(9), 10));
        assert!(!app.register_validator(key(9), 10));

        let delta = app.finalize(1);
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].pubkey, key(9));
        assert_eq!(delta[0].power, 10);
    }
}
