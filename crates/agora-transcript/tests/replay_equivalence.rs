//! Replay + incremental-watch equivalence.
//!
//! Reading a transcript wholly after N lines must produce the same ordered
//! event sequence as replaying the first K lines and then incrementally
//! processing the remaining N-K, for any split point K.

use agora_transcript::{TailerConfig, TranscriptLine, TranscriptStore, TranscriptTailer};
use agora_types::{ChainId, VoteEvent};
use tempfile::TempDir;

fn nth_line(n: u32) -> TranscriptLine {
    TranscriptLine::new(
        n,
        n % 3 != 0,
        format!("Agent {}", n % 4),
        format!("observation number {n}"),
    )
}

fn drain(tailer: &mut TranscriptTailer) -> Vec<VoteEvent> {
    let mut events = Vec::new();
    tailer.poll_once(&mut |e| events.push(e)).unwrap();
    events
}

fn key(e: &VoteEvent) -> (u32, bool, String, String) {
    (
        e.round,
        e.approval,
        e.validator_name.clone(),
        e.message.clone(),
    )
}

#[test]
fn split_replay_equals_whole_file_for_every_split_point() {
    const N: u32 = 12;

    for k in 0..=N {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path()).unwrap();
        let chain = ChainId::new("mainnet");
        let path = store.transcript_path(&chain);

        // First K lines exist before the tailer starts.
        for n in 0..k {
            store.append(&chain, &nth_line(n)).unwrap();
        }

        let mut tailer = TranscriptTailer::new(&path, TailerConfig::default());
        let mut split_events = drain(&mut tailer);
        assert_eq!(split_events.len(), k as usize);

        // Remaining lines arrive while the tailer is watching.
        for n in k..N {
            store.append(&chain, &nth_line(n)).unwrap();
        }
        split_events.extend(drain(&mut tailer));

        // A fresh tailer reading the finished file sees the same sequence.
        let mut whole = TranscriptTailer::new(&path, TailerConfig::default());
        let whole_events = drain(&mut whole);

        assert_eq!(whole_events.len(), N as usize, "split at {k}");
        assert_eq!(
            split_events.iter().map(key).collect::<Vec<_>>(),
            whole_events.iter().map(key).collect::<Vec<_>>(),
            "split at {k}"
        );
    }
}
