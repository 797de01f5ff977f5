#![no_main]
//! Fuzz target for operation wire decoding.
//!
//! Admission checks feed untrusted pool bytes straight into the decoder;
//! it must never panic, and any operation it accepts must re-encode and
//! decode to the same value.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(op) = agora_types::Operation::from_bytes(data) {
        let bytes = op.to_bytes();
        let decoded =
            agora_types::Operation::from_bytes(&bytes).expect("re-encoded operation must decode");
        assert_eq!(decoded, op);
        let _ = op.is_includable();
        let _ = op.originator();
    }
});
