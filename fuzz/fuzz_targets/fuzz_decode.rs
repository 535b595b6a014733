#![no_main]

use fingerprint_frame::core::frame::{decode, decode_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must be rejected or decoded, never panic
    let _ = decode_bytes(data, &[3, 7], 7);
    let _ = decode::<serde_json::Value>(data, &[3, 7], 7);

    if let Some((&k, rest)) = data.split_first() {
        let _ = decode_bytes(rest, &[], usize::from(k));
    }
});
