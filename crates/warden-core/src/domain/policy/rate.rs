use crate::dto::config::RateConfig;

///
/// TokenBucket
///
/// Lazily refilled token bucket. Refill happens at check time: whole tokens
/// accrued since `last_refill` are added and the partial remainder carries
/// over to the next check.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenBucket {
    pub tokens_available: u64,
    pub last_refill: u64,
}

impl TokenBucket {
    /// A fresh bucket starts full.
    #[must_use]
    pub const fn full(config: &RateConfig, now: u64) -> Self {
        Self {
            tokens_available: config.max_tokens,
            last_refill: now,
        }
    }

    pub const fn refill(&mut self, config: &RateConfig, now: u64) {
        if config.time_per_token_ns == 0 {
            self.tokens_available = config.max_tokens;
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_sub(self.last_refill);
        let accrued = elapsed / config.time_per_token_ns;
        let tokens = self.tokens_available.saturating_add(accrued);

        if tokens >= config.max_tokens {
            self.tokens_available = config.max_tokens;
            self.last_refill = now;
        } else {
            self.tokens_available = tokens;
            self.last_refill += accrued * config.time_per_token_ns;
        }
    }

    /// Back at capacity by `now`, and so indistinguishable from a fresh bucket.
    #[must_use]
    pub const fn is_full_at(mut self, config: &RateConfig, now: u64) -> bool {
        self.refill(config, now);
        self.tokens_available >= config.max_tokens
    }

    /// Refill, then take `cost` tokens if available.
    pub const fn try_consume(&mut self, config: &RateConfig, now: u64, cost: u64) -> bool {
        self.refill(config, now);

        if self.tokens_available < cost {
            return false;
        }

        self.tokens_available -= cost;
        true
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: RateConfig = RateConfig {
        max_tokens: 3,
        time_per_token_ns: 100,
    };

    #[test]
    fn drains_then_refuses() {
        let mut bucket = TokenBucket::full(&CONFIG, 0);

        assert!(bucket.try_consume(&CONFIG, 0, 1));
        assert!(bucket.try_consume(&CONFIG, 0, 1));
        assert!(bucket.try_consume(&CONFIG, 0, 1));
        assert!(!bucket.try_consume(&CONFIG, 0, 1));
    }

    #[test]
    fn refill_keeps_partial_progress() {
        let mut bucket = TokenBucket::full(&CONFIG, 0);
        for _ in 0..3 {
            assert!(bucket.try_consume(&CONFIG, 0, 1));
        }

        // 150ns: one token, 50ns carried
        assert!(bucket.try_consume(&CONFIG, 150, 1));
        assert!(!bucket.try_consume(&CONFIG, 150, 1));

        // 200ns: the carried 50ns completes a second token
        assert!(bucket.try_consume(&CONFIG, 200, 1));
    }

    #[test]
    fn refill_never_exceeds_capacity() {
        let mut bucket = TokenBucket {
            tokens_available: 0,
            last_refill: 0,
        };

        bucket.refill(&CONFIG, 1_000_000);
        assert_eq!(bucket.tokens_available, 3);
        assert_eq!(bucket.last_refill, 1_000_000);
    }

    #[test]
    fn cost_above_balance_leaves_bucket_untouched() {
        let mut bucket = TokenBucket::full(&CONFIG, 0);

        assert!(!bucket.try_consume(&CONFIG, 0, 4));
        assert_eq!(bucket.tokens_available, 3);
    }

    #[test]
    fn drained_bucket_is_full_again_after_refill() {
        let mut bucket = TokenBucket::full(&CONFIG, 0);
        assert!(bucket.try_consume(&CONFIG, 0, 2));

        assert!(!bucket.is_full_at(&CONFIG, 199));
        assert!(bucket.is_full_at(&CONFIG, 200));
        assert_eq!(bucket.tokens_available, 1);
    }
}
