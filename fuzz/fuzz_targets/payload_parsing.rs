#![no_main]

//! Fuzz target for inbound message parsing.
//!
//! Any byte string either fails to parse or yields a message that survives
//! re-encoding unchanged.

use inlet_core::NewMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = serde_json::from_slice::<NewMessage>(data) else {
        return;
    };

    let encoded = serde_json::to_vec(&message).unwrap();
    let decoded: NewMessage = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(decoded, message);
});
