#![no_main]

//! Fuzz target for delivery signature verification.
//!
//! Splits the input into secret, payload, and claimed signature. Verification
//! must never panic, must accept the signature it generated itself, and must
//! reject any claimed signature that differs from it.

use inlet_api::crypto::{generate_hmac_hex, verify_signature};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let secret_len = usize::from(data[0]) % data.len();
    let (secret, rest) = data[1..].split_at(secret_len.min(data.len() - 1));
    let secret = String::from_utf8_lossy(secret);
    let split = rest.len() / 2;
    let (payload, claimed) = rest.split_at(split);
    let claimed = String::from_utf8_lossy(claimed);

    let Ok(expected) = generate_hmac_hex(payload, &secret) else {
        return;
    };

    assert!(verify_signature(payload, &expected, &secret));
    assert_eq!(verify_signature(payload, &claimed, &secret), claimed == expected);
});
