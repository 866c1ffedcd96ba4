//! Notification signatures.
//!
//! The processor signs every notification with
//! `hex(SHA-512(order_id ‖ status_code ‖ gross_amount ‖ server_key))` and places the result in the `signature_key`
//! field of the notification body.
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Calculates the signature the processor would attach to a notification with the given fields.
pub fn notification_signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a received signature against the expected one without leaking timing information. Hex case is ignored.
pub fn signature_matches(expected: &str, received: &str) -> bool {
    let received = received.trim().to_ascii_lowercase();
    expected.len() == received.len() && bool::from(expected.as_bytes().ct_eq(received.as_bytes()))
}
