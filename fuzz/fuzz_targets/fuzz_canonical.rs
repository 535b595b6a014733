#![no_main]

use fingerprint_frame::core::canonical::canonicalize_and_hash;
use fingerprint_frame::core::component::{ComponentSet, ComponentValue};
use fingerprint_frame::core::frame::{decode, encode};
use fingerprint_frame::utils::random::SequenceSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };

    let set = ComponentSet::new()
        .with(text, ComponentValue::from(value.clone()))
        .with("raw", text);
    let first = canonicalize_and_hash(&set);
    let second = canonicalize_and_hash(&set.clone());
    assert_eq!(first, second);

    let mut rng = SequenceSource::new(data.to_vec());
    if let Ok(frame) = encode(&value, &[3, 7], 3, 7, &mut rng) {
        let decoded = decode::<serde_json::Value>(&frame, &[3, 7], 7);
        assert!(decoded.is_ok());
    }
});
