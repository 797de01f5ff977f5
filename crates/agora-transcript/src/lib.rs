//! Agora deliberation transcript.
//!
//! Every chain has one append-only, line-oriented transcript file shared by
//! all validator-agent processes on the host. The orchestrator appends one
//! line per deliberation round; observers tail the file and turn growth into
//! structured vote events. The transcript is the only cross-process state in
//! Agora; there is no RPC between agents.
//!
//! # Components
//!
//! - [`TranscriptStore`]: per-chain append-only log plus an auxiliary round
//!   counter, rooted at a data directory
//! - [`TranscriptLine`]: the fixed line grammar
//!   `[Round N] (true|false) |@Name|: summary`
//! - [`TranscriptTailer`]: replay-then-watch reader producing [`VoteEvent`]s
//!   in file-append order
//!
//! Lines are immutable once written; the file is never truncated, rewritten,
//! or reordered. Appends from different processes rely on the filesystem's
//! append semantics for whole-line atomicity, and relative ordering between
//! processes is whatever the filesystem provides.
//!
//! [`VoteEvent`]: agora_types::VoteEvent

mod error;
mod line;
mod store;
mod tailer;

pub use error::{Result, TranscriptError};
pub use line::TranscriptLine;
pub use store::TranscriptStore;
pub use tailer::{TailerConfig, TranscriptTailer};
