//! Refresh cadence, retry backoff and on-demand fetch cooldown for provider
//! certificates.

use std::time::Duration;
use warden_cdk::utils::time::duration_nanos;

/// Delay between scheduled refreshes while fetches succeed.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// First retry delay after a failed fetch; doubles per consecutive failure.
pub const BACKOFF_BASE: Duration = Duration::from_secs(120);

/// Upper bound on the retry delay.
pub const BACKOFF_MAX: Duration = Duration::from_secs(30 * 60);

/// Minimum spacing between on-demand fetches for the same provider.
pub const FETCH_COOLDOWN: Duration = Duration::from_secs(60);

/// Retry delay after `failures` consecutive failures (`failures >= 1`).
#[must_use]
pub fn backoff_delay(failures: u32) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    let shift = (failures - 1).min(16);
    BACKOFF_BASE
        .checked_mul(1 << shift)
        .map_or(BACKOFF_MAX, |delay| delay.min(BACKOFF_MAX))
}

/// Delay before the next scheduled fire at the given backoff level.
#[must_use]
pub fn next_fire_delay(backoff_level: u32) -> Duration {
    if backoff_level == 0 {
        REFRESH_INTERVAL
    } else {
        backoff_delay(backoff_level)
    }
}

/// Earliest time an on-demand fetch may run again after the last attempt.
#[must_use]
pub fn fetch_allowed_at(last_attempt_at: u64, consecutive_failures: u32) -> u64 {
    let window = FETCH_COOLDOWN.max(backoff_delay(consecutive_failures));

    last_attempt_at.saturating_add(duration_nanos(window))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: u64 = 1_000_000_000;

    #[test]
    fn backoff_doubles_from_base() {
        assert_eq!(backoff_delay(1), Duration::from_secs(120));
        assert_eq!(backoff_delay(2), Duration::from_secs(240));
        assert_eq!(backoff_delay(3), Duration::from_secs(480));
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff_delay(5), BACKOFF_MAX);
        assert_eq!(backoff_delay(u32::MAX), BACKOFF_MAX);
    }

    #[test]
    fn success_level_uses_refresh_interval() {
        assert_eq!(next_fire_delay(0), REFRESH_INTERVAL);
        assert_eq!(next_fire_delay(1), BACKOFF_BASE);
    }

    #[test]
    fn cooldown_after_success_is_one_minute() {
        assert_eq!(fetch_allowed_at(1_000 * SEC, 0), 1_060 * SEC);
    }

    #[test]
    fn cooldown_after_failures_follows_backoff() {
        assert_eq!(fetch_allowed_at(1_000 * SEC, 1), 1_120 * SEC);
        assert_eq!(fetch_allowed_at(1_000 * SEC, 2), 1_240 * SEC);
    }
}
