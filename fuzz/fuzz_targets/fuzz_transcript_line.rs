#![no_main]
//! Fuzz target for the transcript line grammar.
//!
//! Transcript files are written by other processes; the parser must handle
//! arbitrary line content without panicking, and anything it accepts must
//! survive a render/re-parse round trip.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(line) = agora_transcript::TranscriptLine::parse(s) {
            let rendered = line.render();
            let reparsed = agora_transcript::TranscriptLine::parse(&rendered)
                .expect("rendered line must re-parse");
            assert_eq!(reparsed, line);
        }
    }
});
