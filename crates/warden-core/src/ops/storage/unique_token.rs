use crate::{
    dto::error::SaveUniqueJtiToken,
    ops::prelude::*,
    storage::stable::unique_token::{TokenHash, UniqueTokenRecord, UniqueTokenStore},
};
use sha2::{Digest, Sha256};

///
/// UniqueTokenOps
/// Replay guard for automation tokens, keyed by the SHA-256 of `jti`.
///

pub struct UniqueTokenOps;

impl UniqueTokenOps {
    #[must_use]
    pub fn hash(jti: &str) -> TokenHash {
        TokenHash(Sha256::digest(jti.as_bytes()).into())
    }

    /// Hash of an unused `jti`. Nothing is written; see [`Self::record`].
    pub fn check(jti: Option<&str>) -> Result<TokenHash, SaveUniqueJtiToken> {
        let jti = jti
            .filter(|jti| !jti.is_empty())
            .ok_or(SaveUniqueJtiToken::MissingJti)?;
        let hash = Self::hash(jti);

        if UniqueTokenStore::contains(&hash) {
            return Err(SaveUniqueJtiToken::TokenReused);
        }

        Ok(hash)
    }

    /// Mark a checked token as consumed.
    pub fn record(hash: TokenHash, provider: OpenIdProvider, now: u64) {
        UniqueTokenStore::insert(
            hash,
            UniqueTokenRecord {
                provider,
                created_at: now,
            },
        );
    }

    #[must_use]
    pub fn len() -> u64 {
        UniqueTokenStore::len()
    }
}

///
/// TESTS
///
