//! Per-chain transcript persistence.

use crate::error::{Result, TranscriptError};
use crate::line::TranscriptLine;
use agora_types::ChainId;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only transcript store rooted at a data directory.
///
/// Each chain owns two files under the root: `<chain>.txt` (the transcript)
/// and `<chain>_round.txt` (an auxiliary display round counter). The store
/// only ever appends whole lines; it never rewrites or truncates. Multiple
/// processes may hold stores over the same root; each append is a single
/// write-and-flush of one line, and the round counter is deliberately not
/// atomic across processes (round numbers inside transcript lines are chosen
/// by the orchestrator, not read from the counter).
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    root: PathBuf,
}

impl TranscriptStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| TranscriptError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Returns the transcript file path for a chain.
    pub fn transcript_path(&self, chain: &ChainId) -> PathBuf {
        self.root.join(format!("{}.txt", chain.as_str()))
    }

    fn round_path(&self, chain: &ChainId) -> PathBuf {
        self.root.join(format!("{}_round.txt", chain.as_str()))
    }

    /// Reads the entire transcript for a chain, creating an empty file if
    /// none exists yet so that tailers have something to watch.
    pub fn read(&self, chain: &ChainId) -> Result<String> {
        let path = self.transcript_path(chain);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                touch(&path)?;
                Ok(String::new())
            }
            Err(e) => Err(TranscriptError::io(&path, e)),
        }
    }

    /// Appends one line to a chain's transcript and flushes it.
    pub fn append(&self, chain: &ChainId, line: &TranscriptLine) -> Result<()> {
        let path = self.transcript_path(chain);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TranscriptError::io(&path, e))?;

        let rendered = line.render();
        file.write_all(rendered.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.flush())
            .map_err(|e| TranscriptError::io(&path, e))?;

        debug!(chain = %chain, round = line.round, agent = %line.agent_name, "transcript line appended");
        Ok(())
    }

    /// Returns the chain's display round counter, initializing it to 1 on
    /// first access.
    pub fn current_round(&self, chain: &ChainId) -> Result<u32> {
        let path = self.round_path(chain);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().parse().unwrap_or(1)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&path, "1").map_err(|e| TranscriptError::io(&path, e))?;
                Ok(1)
            }
            Err(e) => Err(TranscriptError::io(&path, e)),
        }
    }

    /// Increments the chain's display round counter and returns the new
    /// value. Read-modify-write; races with other processes only affect this
    /// display value, never transcript integrity.
    pub fn increment_round(&self, chain: &ChainId) -> Result<u32> {
        let next = self.current_round(chain)? + 1;
        let path = self.round_path(chain);
        fs::write(&path, next.to_string()).map_err(|e| TranscriptError::io(&path, e))?;
        Ok(next)
    }
}

fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| TranscriptError::io(path, e))
}
