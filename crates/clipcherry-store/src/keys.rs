//! Key encoding for the `RocksDB` session store.

use clipcherry_core::SessionToken;

/// Prefix shared by all session keys.
pub const SESSION_PREFIX: &[u8] = b"session:";

/// Create a session key from a token.
///
/// Format: `session:` || token bytes
#[must_use]
pub fn session_key(token: &SessionToken) -> Vec<u8> {
    let mut key = Vec::with_capacity(SESSION_PREFIX.len() + token.as_str().len());
    key.extend_from_slice(SESSION_PREFIX);
    key.extend_from_slice(token.as_str().as_bytes());
    key
}
