//! Structured judgments produced by deliberation rounds.
//!
//! A verdict is created fresh each round and discarded; only its rendered
//! transcript line is durable. Oracle responses are parsed permissively:
//! missing fields default, so a sparse but well-formed response still yields
//! a usable verdict (mirroring the zero-value degradation rule).

use crate::operation::OperationKind;
use serde::{Deserialize, Serialize};

/// Review of a paper submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperReview {
    /// Brief overview, including any evolution of opinion across rounds.
    pub summary: String,
    /// Major issues identified.
    pub flaws: Vec<String>,
    /// Constructive feedback.
    pub suggestions: Vec<String>,
    /// Whether the results appear reproducible.
    pub is_reproducible: bool,
    /// Final approve/reject stance.
    pub approval: bool,
}

/// Review of a loan request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanReview {
    /// Brief overview of the reviewer's position.
    pub summary: String,
    /// Risks identified with the request.
    pub risk_factors: Vec<String>,
    /// Terms the reviewer would attach.
    pub terms: Vec<String>,
    /// Final approve/reject stance.
    pub approval: bool,
}

/// One agent's take in a discussion.
///
/// The stance flags are accepted exactly as the oracle returned them: a
/// response setting more than one of support/oppose/question true is kept
/// as-is, and the disposition used for voting is the `support` flag alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionTake {
    /// The discussion message, possibly mentioning peers as `|@Name|`.
    pub message: String,
    /// Agent supports the statement.
    pub support: bool,
    /// Agent opposes the statement.
    pub oppose: bool,
    /// Agent is unsure.
    pub question: bool,
}

/// The judgment produced by one deliberation round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Paper review verdict.
    Paper(PaperReview),
    /// Loan review verdict.
    Loan(LoanReview),
    /// Discussion stance verdict.
    Discussion(DiscussionTake),
}

impl Verdict {
    /// The zero-value verdict for an operation kind, used when the oracle is
    /// unavailable or its response cannot be parsed. Disposition is false,
    /// but callers must treat it as a non-blocking default, not a veto.
    pub fn default_for(kind: OperationKind) -> Self {
        match kind {
            OperationKind::PaperSubmission => Verdict::Paper(PaperReview::default()),
            OperationKind::LoanRequest => Verdict::Loan(LoanReview::default()),
            OperationKind::GenericDiscussion | OperationKind::ValidatorRegistration => {
                Verdict::Discussion(DiscussionTake::default())
            }
        }
    }

    /// The boolean disposition rendered into transcript lines: approval for
    /// reviews, the support flag for discussions.
    pub fn disposition(&self) -> bool {
        match self {
            Verdict::Paper(r) => r.approval,
            Verdict::Loan(r) => r.approval,
            Verdict::Discussion(d) => d.support,
        }
    }

    /// The free-text summary rendered into transcript lines.
    pub fn summary(&self) -> &str {
        match self {
            Verdict::Paper(r) => &r.summary,
            Verdict::Loan(r) => &r.summary,
            Verdict::Discussion(d) => &d.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_response_parses_with_defaults() {
        let review: PaperReview =
            serde_json::from_str(r#"{"summary": "looks fine", "approval": true}"#).unwrap();
        assert!(review.approval);
        assert!(review.flaws.is_empty());
        assert!(!review.is_reproducible);
    }

    #[test]
    fn test_disposition_per_kind() {
        let paper = Verdict::Paper(PaperReview {
            approval: true,
            ..Default::default()
        });
        assert!(paper.disposition());

        let take = Verdict::Discussion(DiscussionTake {
            message: "hm".into(),
            support: false,
            oppose: true,
            question: false,
        });
        assert!(!take.disposition());
    }

    #[test]
    fn test_multi_true_stance_is_preserved() {
        let take: DiscussionTake =
            serde_json::from_str(r#"{"message": "both?", "support": true, "oppose": true}"#)
                .unwrap();
        assert!(take.support && take.oppose);
        assert!(Verdict::Discussion(take).disposition());
    }

    #[test]
    fn test_default_verdict_is_negative() {
        for kind in [
            OperationKind::PaperSubmission,
            OperationKind::LoanRequest,
            OperationKind::GenericDiscussion,
        ] {
            let v = Verdict::default_for(kind);
            assert!(!v.disposition());
            assert!(v.summary().is_empty());
        }
    }
}
