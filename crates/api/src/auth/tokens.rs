//! Single-use opaque tokens (email verification, password reset).
//!
//! The plaintext is sent to the user by email; only its SHA-256 hash is
//! stored, so a database leak does not expose usable links.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Random bytes per token (hex-encoded to twice this length).
const TOKEN_BYTES: usize = 32;

/// Generate a random token. Returns `(plaintext, sha256_hex_hash)`.
pub fn generate_token() -> (String, String) {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}
