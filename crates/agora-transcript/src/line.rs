//! The fixed transcript line grammar.

use crate::error::TranscriptError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Grammar for one transcript line. Cross-process contract, bit-exact:
/// `[Round N] (true|false) |@Name|: summary`.
static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[Round (\d+)\] \((true|false)\) \|@([^|]+)\|: (.+)$")
        .unwrap_or_else(|e| panic!("transcript line regex is invalid: {e}"))
});

/// One parsed transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// Zero-based round index chosen by the orchestrator.
    pub round: u32,
    /// Boolean disposition of the round's verdict.
    pub disposition: bool,
    /// Display name of the emitting agent (contains no `|`).
    pub agent_name: String,
    /// The round summary.
    pub message: String,
}

impl TranscriptLine {
    /// Builds a line, stripping `|` from the agent name and surrounding
    /// whitespace from the message so the rendered form stays within the
    /// grammar and survives a render/parse round trip unchanged.
    pub fn new(
        round: u32,
        disposition: bool,
        agent_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            round,
            disposition,
            agent_name: agent_name.into().replace('|', ""),
            message: message.into().trim().to_string(),
        }
    }

    /// Renders the line (without trailing newline).
    pub fn render(&self) -> String {
        format!(
            "[Round {}] ({}) |@{}|: {}",
            self.round, self.disposition, self.agent_name, self.message
        )
    }

    /// Parses one line of transcript text.
    pub fn parse(line: &str) -> Result<Self, TranscriptError> {
        let caps = LINE_RE
            .captures(line)
            .ok_or_else(|| TranscriptError::UnparseableLine(line.to_string()))?;

        // The grammar guarantees digits and a true/false literal.
        let round: u32 = caps[1]
            .parse()
            .map_err(|_| TranscriptError::UnparseableLine(line.to_string()))?;
        let disposition = &caps[2] == "true";
        let agent_name = caps[3].to_string();
        // Kept byte-for-byte; parse and render are mutual inverses.
        let message = caps[4].to_string();

        Ok(Self {
            round,
            disposition,
            agent_name,
            message,
        })
    }
}

impl std::fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
