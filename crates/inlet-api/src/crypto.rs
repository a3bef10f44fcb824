//! HMAC-SHA256 signatures over raw webhook bodies.
//!
//! The signature is the lowercase hex digest of the exact request bytes,
//! keyed by the shared secret. Bodies are never re-serialized before
//! verification.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Built-in secret used when none is configured. Deliveries still verify
/// against it, but readiness reports the secret as missing.
pub const DEFAULT_WEBHOOK_SECRET: &str = "default_secret_for_testing";

/// Signature generation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The secret cannot be used as an HMAC key.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSecret => write!(f, "invalid secret key"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Shared secret for delivery signatures.
///
/// `Debug` never prints the secret.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Wraps a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// True when the secret was explicitly set to something other than the
    /// insecure default.
    pub fn is_configured(&self) -> bool {
        !self.0.is_empty() && self.0 != DEFAULT_WEBHOOK_SECRET
    }

    /// Verifies a hex signature over `payload`.
    pub fn verify(&self, payload: &[u8], signature_hex: &str) -> bool {
        verify_signature(payload, signature_hex, &self.0)
    }

    /// Signs `payload`, returning the lowercase hex digest.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::InvalidSecret` if the key is rejected.
    pub fn sign(&self, payload: &[u8]) -> Result<String, SignatureError> {
        generate_hmac_hex(payload, &self.0)
    }
}

impl Default for SigningSecret {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK_SECRET)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"***").finish()
    }
}

/// Verifies a webhook signature using HMAC-SHA256.
///
/// Recomputes the lowercase hex digest of `payload` keyed by `secret` and
/// compares it to `signature_hex` in constant time. Returns false on any
/// mismatch, an empty signature, or malformed hex; never panics.
///
/// # Example
///
/// ```
/// use inlet_api::crypto::{generate_hmac_hex, verify_signature};
///
/// let payload = br#"{"message_id":"m1"}"#;
/// let signature = generate_hmac_hex(payload, "secret").unwrap();
///
/// assert!(verify_signature(payload, &signature, "secret"));
/// assert!(!verify_signature(payload, &signature, "other"));
/// ```
pub fn verify_signature(payload: &[u8], signature_hex: &str, secret: &str) -> bool {
    if signature_hex.is_empty() {
        return false;
    }

    match generate_hmac_hex(payload, secret) {
        Ok(expected) => timing_safe_eq(signature_hex.as_bytes(), expected.as_bytes()),
        Err(_) => false,
    }
}

/// Generates an HMAC-SHA256 signature as a lowercase hex string.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret key is rejected.
pub fn generate_hmac_hex(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison.
///
/// Every byte is examined regardless of where the first difference is, so
/// timing reveals nothing about how much of a guess was correct. Only the
/// length, which is public, short-circuits.
fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.iter().zip(b.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
