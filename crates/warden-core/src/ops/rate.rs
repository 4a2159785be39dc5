use crate::{
    domain::policy::rate::TokenBucket,
    dto::config::RateConfig,
    ops::prelude::*,
    storage::heap::rate::{RateBucketKey, RateBucketStore},
};
use std::time::Duration;
use warden_cdk::utils::time::duration_nanos;

pub use crate::storage::heap::rate::RateOperation;

/// Global certificate fetch budget when none is configured.
pub const DEFAULT_CERTIFICATE_FETCH_RATE: RateConfig = RateConfig {
    max_tokens: 10,
    time_per_token_ns: 60_000_000_000,
};

///
/// RateLimitOps
///

pub struct RateLimitOps;

impl RateLimitOps {
    /// Take `cost` tokens from the bucket for `(operation, caller)`.
    ///
    /// `config: None` means the operation is unlimited. Buckets are created
    /// full on first use and refilled lazily here. Per-caller buckets of the
    /// same operation that have refilled to capacity are dropped, since a
    /// fresh bucket would behave the same.
    pub fn try_consume(
        operation: RateOperation,
        caller: Option<Principal>,
        config: Option<&RateConfig>,
        now: u64,
        cost: u64,
    ) -> bool {
        let Some(config) = config else {
            return true;
        };

        if caller.is_some() {
            RateBucketStore::retain(|key, bucket| {
                key.operation != operation
                    || key.caller.is_none()
                    || !bucket.is_full_at(config, now)
            });
        }

        let key = RateBucketKey { operation, caller };
        let allowed = RateBucketStore::with_bucket(
            key,
            || TokenBucket::full(config, now),
            |bucket| bucket.try_consume(config, now, cost),
        );

        if !allowed {
            log!(
                Topic::RateLimit,
                Warn,
                "rate limit reached for {operation:?} (caller: {caller:?})"
            );
        }

        allowed
    }

    /// Tokens left in a bucket after refilling to `now`; `None` if never used.
    #[must_use]
    pub fn tokens_available(
        operation: RateOperation,
        caller: Option<Principal>,
        config: &RateConfig,
        now: u64,
    ) -> Option<u64> {
        let key = RateBucketKey { operation, caller };

        RateBucketStore::get(&key).map(|mut bucket| {
            bucket.refill(config, now);
            bucket.tokens_available
        })
    }

    #[must_use]
    pub fn per_duration(max_tokens: u64, period: Duration) -> RateConfig {
        RateConfig {
            max_tokens,
            time_per_token_ns: duration_nanos(period),
        }
    }
}

///
/// TESTS
///
