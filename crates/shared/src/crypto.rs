//! Hashing helpers for the shared API key.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a presented API key against the configured one.
///
/// Both values are hashed first so the comparison always runs over two
/// 64-character digests, whatever the input lengths.
pub fn api_key_matches(presented: &str, expected: &str) -> bool {
    let a = sha256_hex(presented);
    let b = sha256_hex(expected);
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
