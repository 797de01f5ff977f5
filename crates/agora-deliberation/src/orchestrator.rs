//! The round-running deliberation orchestrator.

use crate::oracle::{DeliberationOracle, OracleError};
use crate::prompt;
use agora_transcript::{TranscriptLine, TranscriptStore};
use agora_types::{Agent, ChainId, DiscussionTake, LoanReview, Operation, OperationKind, PaperReview, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Orchestrator knobs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound for one oracle call; a timeout degrades that round.
    pub call_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// How a round that produced no usable verdict failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// The oracle answered, but not in the requested JSON shape.
    UnparseableResponse,
}

/// The result of one deliberation round.
///
/// Callers must handle all three arms: a degraded or transport-failed round
/// contributes the kind's default verdict to the transcript but is not an
/// authoritative rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    /// The oracle produced a parseable verdict.
    Verdict(Verdict),
    /// The oracle answered unusably; the default verdict stood in.
    Degraded(DegradeReason),
    /// The oracle call failed or timed out; the default verdict stood in.
    Transport(OracleError),
}

impl RoundOutcome {
    /// The verdict this round contributed (default for non-verdict arms).
    pub fn verdict_or_default(&self, kind: OperationKind) -> Verdict {
        match self {
            RoundOutcome::Verdict(v) => v.clone(),
            RoundOutcome::Degraded(_) | RoundOutcome::Transport(_) => Verdict::default_for(kind),
        }
    }
}

/// A completed deliberation.
#[derive(Debug, Clone)]
pub struct Deliberation {
    /// The binding verdict (the final round's contribution).
    pub verdict: Verdict,
    /// Per-round outcomes in round order, binding round last.
    pub rounds: Vec<RoundOutcome>,
}

impl Deliberation {
    fn skipped(kind: OperationKind) -> Self {
        Self {
            verdict: Verdict::default_for(kind),
            rounds: Vec::new(),
        }
    }
}

/// Summary written for rounds whose verdict was the stand-in default, so
/// the transcript line still matches the grammar.
const DEGRADED_SUMMARY: &str = "no verdict recorded for this round";

/// Runs multi-round deliberations against the shared transcript.
///
/// Review-style operations get N discussion rounds (3 for papers, 4 for
/// loans) plus one binding round; discussions get a single binding round.
/// Every round - the binding one included - appends a line to the chain's
/// transcript, so a loan review leaves 5 lines with round indices 0..=4 and
/// the returned verdict equals the last line's content.
pub struct Orchestrator {
    oracle: Arc<dyn DeliberationOracle>,
    store: TranscriptStore,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Creates an orchestrator over an oracle and a transcript store.
    pub fn new(
        oracle: Arc<dyn DeliberationOracle>,
        store: TranscriptStore,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            oracle,
            store,
            config,
        }
    }

    /// Deliberates one operation for one agent.
    ///
    /// Non-validator agents and validator registrations are not deliberated:
    /// the zero-value verdict comes back with no transcript side effects.
    pub async fn deliberate(
        &self,
        agent: &Agent,
        operation: &Operation,
        chain: &ChainId,
    ) -> Deliberation {
        let kind = operation.kind();

        if !agent.is_validator || kind == OperationKind::ValidatorRegistration {
            return Deliberation::skipped(kind);
        }

        let discussion_rounds = discussion_rounds(kind);
        let mut rounds = Vec::with_capacity(discussion_rounds as usize + 1);
        let mut binding = Verdict::default_for(kind);

        for round in 0..=discussion_rounds {
            let transcript = match self.store.read(chain) {
                Ok(text) => text,
                Err(e) => {
                    // A lost read only costs this round its history context.
                    warn!(chain = %chain, error = %e, "failed to read transcript for round");
                    String::new()
                }
            };

            let Some(prompt) = prompt::for_operation(agent, operation, &transcript) else {
                return Deliberation::skipped(kind);
            };

            let outcome = self.call_round(&prompt, kind).await;
            let verdict = outcome.verdict_or_default(kind);
            let is_binding = round == discussion_rounds;

            self.append_round_line(chain, agent, round, &verdict);
            debug!(
                chain = %chain,
                agent = %agent.name,
                round,
                binding = is_binding,
                disposition = verdict.disposition(),
                "deliberation round complete"
            );

            if is_binding {
                binding = verdict;
            }
            rounds.push(outcome);
        }

        Deliberation {
            verdict: binding,
            rounds,
        }
    }

    async fn call_round(&self, prompt: &str, kind: OperationKind) -> RoundOutcome {
        let response = tokio::time::timeout(self.config.call_timeout, self.oracle.ask(prompt)).await;

        match response {
            Err(_) => RoundOutcome::Transport(OracleError::Timeout),
            Ok(Err(e)) => RoundOutcome::Transport(e),
            Ok(Ok(text)) => match parse_verdict(kind, &text) {
                Some(verdict) => RoundOutcome::Verdict(verdict),
                None => {
                    warn!(kind = %kind, "oracle response did not parse as a verdict");
                    RoundOutcome::Degraded(DegradeReason::UnparseableResponse)
                }
            },
        }
    }

    fn append_round_line(&self, chain: &ChainId, agent: &Agent, round: u32, verdict: &Verdict) {
        let summary = verdict.summary().trim();
        let message = if summary.is_empty() {
            DEGRADED_SUMMARY
        } else {
            summary
        };

        let line = TranscriptLine::new(round, verdict.disposition(), agent.transcript_name(), message);
        if let Err(e) = self.store.append(chain, &line) {
            // Losing a line is recoverable; blocking block production is not.
            warn!(chain = %chain, round, error = %e, "failed to append transcript line");
        }
    }
}

/// Discussion rounds per kind; the binding round comes on top.
fn discussion_rounds(kind: OperationKind) -> u32 {
    match kind {
        OperationKind::PaperSubmission => 3,
        OperationKind::LoanRequest => 4,
        OperationKind::GenericDiscussion | OperationKind::ValidatorRegistration => 0,
    }
}

/// Defensively parses an oracle response into the kind's verdict shape.
fn parse_verdict(kind: OperationKind, response: &str) -> Option<Verdict> {
    let body = strip_code_fences(response);

    match kind {
        OperationKind::PaperSubmission => serde_json::from_str::<PaperReview>(body)
            .ok()
            .map(Verdict::Paper),
        OperationKind::LoanRequest => serde_json::from_str::<LoanReview>(body)
            .ok()
            .map(Verdict::Loan),
        OperationKind::GenericDiscussion => serde_json::from_str::<DiscussionTake>(body)
            .ok()
            .map(Verdict::Discussion),
        OperationKind::ValidatorRegistration => None,
    }
}

/// Models wrap JSON in markdown fences often enough to be worth tolerating.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
