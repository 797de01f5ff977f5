//! Operations carried inside blocks.
//!
//! Every proposed unit of work is one [`Operation`]. The external engine
//! orders serialized operations into blocks; the callback state machine
//! decodes them and dispatches on the kind tag.

use crate::identity::PublicKeyBytes;
use serde::{Deserialize, Serialize};

/// The kind tag of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A research paper submitted for panel review.
    PaperSubmission,
    /// A loan request reviewed by the banking panel.
    LoanRequest,
    /// A free-form statement discussed by the panel.
    GenericDiscussion,
    /// A request to add a validator to the set.
    ValidatorRegistration,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::PaperSubmission => write!(f, "paper_submission"),
            OperationKind::LoanRequest => write!(f, "loan_request"),
            OperationKind::GenericDiscussion => write!(f, "generic_discussion"),
            OperationKind::ValidatorRegistration => write!(f, "validator_registration"),
        }
    }
}

/// A proposed unit of work, immutable once constructed.
///
/// Wire format is JSON with a `kind` tag; undecodable bytes are skipped by
/// every phase that receives them, never treated as fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// A research paper submitted for multi-round review.
    PaperSubmission {
        /// Paper title.
        title: String,
        /// Abstract.
        #[serde(rename = "abstract")]
        abstract_text: String,
        /// Full paper content.
        content: String,
        /// Author identity.
        author: String,
        /// Topic tags.
        #[serde(default)]
        topic_tags: Vec<String>,
        /// Unix submission timestamp.
        #[serde(default)]
        timestamp: i64,
    },

    /// A loan request described in free text.
    LoanRequest {
        /// Requesting identity.
        originator: String,
        /// Request details (amount, collateral, purpose).
        details: String,
    },

    /// A statement put to the panel for discussion.
    GenericDiscussion {
        /// Posting identity.
        originator: String,
        /// The statement under discussion.
        topic: String,
    },

    /// A request to register a new validator.
    ValidatorRegistration {
        /// Requesting identity.
        originator: String,
        /// Raw public key of the validator to add.
        pubkey: PublicKeyBytes,
    },
}

impl Operation {
    /// Decodes an operation from wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the operation to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Operation serialization cannot fail: no maps with non-string keys.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::PaperSubmission { .. } => OperationKind::PaperSubmission,
            Operation::LoanRequest { .. } => OperationKind::LoanRequest,
            Operation::GenericDiscussion { .. } => OperationKind::GenericDiscussion,
            Operation::ValidatorRegistration { .. } => OperationKind::ValidatorRegistration,
        }
    }

    /// Returns the originating identity.
    pub fn originator(&self) -> &str {
        match self {
            Operation::PaperSubmission { author, .. } => author,
            Operation::LoanRequest { originator, .. } => originator,
            Operation::GenericDiscussion { originator, .. } => originator,
            Operation::ValidatorRegistration { originator, .. } => originator,
        }
    }

    /// Whether the operation makes the cut for block proposal.
    ///
    /// Papers need a non-empty title and content, discussions and loans need
    /// non-empty content, registrations are always included.
    pub fn is_includable(&self) -> bool {
        match self {
            Operation::PaperSubmission { title, content, .. } => {
                !title.is_empty() && !content.is_empty()
            }
            Operation::LoanRequest { details, .. } => !details.is_empty(),
            Operation::GenericDiscussion { topic, .. } => !topic.is_empty(),
            Operation::ValidatorRegistration { .. } => true,
        }
    }
}
