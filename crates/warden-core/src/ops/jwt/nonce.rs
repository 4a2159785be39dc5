use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use candid::Principal;
use sha2::{Digest, Sha256};

/// `base64url(SHA-256(salt ‖ caller))`, the value a token must carry in
/// `nonce` (users) or `aud` (automation) to be bound to this caller.
#[must_use]
pub fn build_nonce(salt: &[u8; 32], caller: &Principal) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(caller.as_slice());

    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

///
/// TESTS
///
