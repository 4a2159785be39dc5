//! Time-window rules for token claims. Claims are in seconds, `now` in
//! nanoseconds.

use std::time::Duration;

/// How far in the future `iat` may lie (clock skew).
pub const IAT_FUTURE_SKEW: Duration = Duration::from_secs(2 * 60);

/// Maximum accepted token age measured from `iat`.
pub const IAT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

///
/// IatViolation
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IatViolation {
    Future,
    Expired,
}

impl IatViolation {
    /// Claim name reported to callers.
    #[must_use]
    pub const fn claim(self) -> &'static str {
        match self {
            Self::Future => "iat_future",
            Self::Expired => "iat_expired",
        }
    }
}

const fn secs_to_nanos(secs: u64) -> u64 {
    secs.saturating_mul(1_000_000_000)
}

/// Accept `now - 10min <= iat <= now + 2min`.
pub const fn check_iat(iat_secs: u64, now: u64) -> Result<(), IatViolation> {
    let iat = secs_to_nanos(iat_secs);

    if iat > now.saturating_add(secs_to_nanos(IAT_FUTURE_SKEW.as_secs())) {
        return Err(IatViolation::Future);
    }
    if iat < now.saturating_sub(secs_to_nanos(IAT_MAX_AGE.as_secs())) {
        return Err(IatViolation::Expired);
    }

    Ok(())
}

/// True while a `nbf` claim still lies in the future.
#[must_use]
pub const fn is_immature(nbf_secs: u64, now: u64) -> bool {
    secs_to_nanos(nbf_secs) > now
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_SECS: u64 = 1_700_000_000;
    const NOW: u64 = NOW_SECS * 1_000_000_000;

    #[test]
    fn window_edges_are_inclusive() {
        assert_eq!(check_iat(NOW_SECS + 120, NOW), Ok(()));
        assert_eq!(check_iat(NOW_SECS - 600, NOW), Ok(()));
    }

    #[test]
    fn outside_window_is_rejected() {
        assert_eq!(check_iat(NOW_SECS + 121, NOW), Err(IatViolation::Future));
        assert_eq!(check_iat(NOW_SECS - 601, NOW), Err(IatViolation::Expired));
    }

    #[test]
    fn five_minute_old_token_expires_after_eleven_more() {
        let iat = NOW_SECS - 300;

        assert_eq!(check_iat(iat, NOW), Ok(()));
        assert_eq!(
            check_iat(iat, NOW + 11 * 60 * 1_000_000_000),
            Err(IatViolation::Expired)
        );
    }

    #[test]
    fn nbf_in_future_is_immature() {
        assert!(is_immature(NOW_SECS + 1, NOW));
        assert!(!is_immature(NOW_SECS, NOW));
    }
}
