//! Transcript tailing: replay existing lines, then watch for growth.

use crate::error::{Result, TranscriptError};
use crate::line::TranscriptLine;
use crate::store::TranscriptStore;
use agora_types::{ChainId, VoteEvent};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Tailer behavior knobs.
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// How often to check the file for growth.
    pub poll_interval: Duration,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// Follows one chain's transcript file and turns appended lines into
/// [`VoteEvent`]s, in file-append order.
///
/// On start the tailer replays every existing line, then only ever reads
/// bytes past the last observed offset, so each line is delivered exactly
/// once per tailer. Lines that do not match the grammar are logged and
/// dropped. Multiple independent tailers over the same file are fine: a
/// late-joining observer replays full history while existing ones see only
/// the delta.
#[derive(Debug)]
pub struct TranscriptTailer {
    path: PathBuf,
    config: TailerConfig,
    /// Bytes consumed so far, always ending on a line boundary.
    offset: u64,
}

impl TranscriptTailer {
    /// Creates a tailer over an explicit transcript file path.
    pub fn new(path: impl Into<PathBuf>, config: TailerConfig) -> Self {
        Self {
            path: path.into(),
            config,
            offset: 0,
        }
    }

    /// Creates a tailer for a chain's transcript in the given store.
    pub fn for_chain(store: &TranscriptStore, chain: &ChainId) -> Self {
        Self::new(store.transcript_path(chain), TailerConfig::default())
    }

    /// Returns the byte offset consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads any bytes appended past the current offset, parses complete
    /// lines, and hands matched events to `sink` in append order. Returns
    /// the number of events delivered.
    ///
    /// A missing file counts as empty (the writer may not have created it
    /// yet). A trailing partial line (no newline yet) is left for the next
    /// poll so a half-written line is never parsed.
    pub fn poll_once(&mut self, sink: &mut dyn FnMut(VoteEvent)) -> Result<usize> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(TranscriptError::io(&self.path, e)),
        };

        let len = file
            .metadata()
            .map_err(|e| TranscriptError::io(&self.path, e))?
            .len();
        if len <= self.offset {
            return Ok(0);
        }

        // Seek past the consumed prefix; only the appended bytes are read.
        file.seek(SeekFrom::Start(self.offset))
            .map_err(|e| TranscriptError::io(&self.path, e))?;
        let mut fresh = Vec::with_capacity((len - self.offset) as usize);
        file.read_to_end(&mut fresh)
            .map_err(|e| TranscriptError::io(&self.path, e))?;

        // Only consume up to the last complete line.
        let Some(last_newline) = fresh.iter().rposition(|&b| b == b'\n') else {
            return Ok(0);
        };
        let complete = &fresh[..=last_newline];

        let mut delivered = 0;
        for raw in String::from_utf8_lossy(complete).lines() {
            if raw.is_empty() {
                continue;
            }
            match TranscriptLine::parse(raw) {
                Ok(line) => {
                    sink(vote_event(&line));
                    delivered += 1;
                }
                Err(_) => {
                    warn!(path = %self.path.display(), line = raw, "dropping unparseable transcript line");
                }
            }
        }

        self.offset += (last_newline + 1) as u64;
        debug!(
            path = %self.path.display(),
            offset = self.offset,
            delivered,
            "transcript poll"
        );
        Ok(delivered)
    }

    /// Replays all existing lines, then polls for growth forever, delivering
    /// events to `sink` in append order.
    pub async fn run(mut self, mut sink: impl FnMut(VoteEvent)) -> Result<()> {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            if let Err(e) = self.poll_once(&mut sink) {
                // Transcript I/O failure is never fatal to the watcher.
                warn!(error = %e, "transcript poll failed");
            }
            interval.tick().await;
        }
    }
}

fn vote_event(line: &TranscriptLine) -> VoteEvent {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    VoteEvent {
        // The transcript does not carry a separate agent id; the display
        // name doubles as the feed identity.
        validator_id: line.agent_name.clone(),
        validator_name: line.agent_name.clone(),
        message: line.message.clone(),
        timestamp_unix: now,
        round: line.round,
        approval: line.disposition,
    }
}
