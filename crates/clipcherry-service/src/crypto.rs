//! Password digests and session token generation.
//!
//! Passwords are stored as a SHA-256 hex digest without a per-user salt. When
//! a server-side pepper is configured the digest is HMAC-SHA256 keyed by it.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

use clipcherry_core::SessionToken;

type HmacSha256 = Hmac<Sha256>;

/// Length of issued session tokens.
pub const SESSION_TOKEN_LENGTH: usize = 32;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Compute HMAC-SHA256 and return hex-encoded result.
///
/// # Panics
///
/// This function will never panic in practice. The `expect` call is guarded by
/// the invariant that HMAC-SHA256 accepts keys of any size per RFC 2104.
#[must_use]
pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    // INVARIANT: HMAC-SHA256 accepts keys of any size per RFC 2104.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// SHA-256 of a string, hex-encoded.
#[must_use]
pub fn sha256_hex(message: &str) -> String {
    hex::encode(Sha256::digest(message.as_bytes()))
}

/// Digest a password for storage.
#[must_use]
pub fn hash_password(password: &str, pepper: Option<&str>) -> String {
    match pepper {
        Some(pepper) => hmac_sha256_hex(pepper, password),
        None => sha256_hex(password),
    }
}

/// Check a password against a stored digest.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str, pepper: Option<&str>) -> bool {
    constant_time_eq(&hash_password(password, pepper), stored_hash)
}

/// Constant-time string comparison to prevent timing attacks.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Random alphanumeric string of `length` characters.
#[must_use]
pub fn random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())]))
        .collect()
}

/// A fresh session token.
#[must_use]
pub fn new_session_token() -> SessionToken {
    SessionToken::new(random_string(SESSION_TOKEN_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hmac_sha256_produces_correct_length() {
        let result = hmac_sha256_hex("key", "The quick brown fox jumps over the lazy dog");
        assert_eq!(result.len(), 64);
    }

    #[test]
    fn password_hash_is_unsalted_and_deterministic() {
        assert_eq!(hash_password("hunter2", None), hash_password("hunter2", None));
        assert_ne!(hash_password("hunter2", None), hash_password("hunter3", None));
    }

    #[test]
    fn pepper_changes_the_digest() {
        let plain = hash_password("hunter2", None);
        let peppered = hash_password("hunter2", Some("pepper"));
        assert_ne!(plain, peppered);
        assert!(verify_password("hunter2", &peppered, Some("pepper")));
        assert!(!verify_password("hunter2", &peppered, None));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let stored = hash_password("right", None);
        assert!(verify_password("right", &stored, None));
        assert!(!verify_password("wrong", &stored, None));
    }

    #[test]
    fn constant_time_eq_different_strings() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
    }

    #[test]
    fn random_string_is_alphanumeric() {
        let s = random_string(500);
        assert_eq!(s.len(), 500);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn session_tokens_are_unique() {
        let a = new_session_token();
        let b = new_session_token();
        assert_eq!(a.as_str().len(), SESSION_TOKEN_LENGTH);
        assert_ne!(a, b);
    }
}
