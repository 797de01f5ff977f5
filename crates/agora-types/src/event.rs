//! Live observer feed records.

use serde::{Deserialize, Serialize};

/// One deliberation vote, as delivered to live observers.
///
/// Produced by the transcript tailer from matched transcript lines and
/// published through the event fan-out in file-append order. Field names on
/// the wire follow the external feed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEvent {
    /// Identifier of the voting validator's agent.
    #[serde(rename = "validatorId")]
    pub validator_id: String,

    /// Display name of the voting validator's agent.
    #[serde(rename = "validatorName")]
    pub validator_name: String,

    /// The round summary as written to the transcript.
    pub message: String,

    /// Wall-clock receipt time (unix seconds), assigned by the tailer.
    #[serde(rename = "timestampUnix")]
    pub timestamp_unix: i64,

    /// Round index parsed from the transcript line.
    pub round: u32,

    /// Disposition parsed from the transcript line.
    pub approval: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_field_names() {
        let event = VoteEvent {
            validator_id: "Ada".into(),
            validator_name: "Ada".into(),
            message: "approved with caveats".into(),
            timestamp_unix: 1_700_000_000,
            round: 3,
            approval: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"validatorId\""));
        assert!(json.contains("\"validatorName\""));
        assert!(json.contains("\"timestampUnix\""));
        assert!(json.contains("\"approval\":true"));
    }
}
