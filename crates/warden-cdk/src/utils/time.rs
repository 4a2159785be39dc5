//!
//! Time helpers abstracting over host/IC execution. On wasm the IC clock is
//! read; host builds (unit tests, tooling) fall back to `SystemTime`.
//!

use std::time::{Duration, SystemTime};

// time_nanos
#[allow(unreachable_code)]
fn time_nanos() -> u128 {
    #[cfg(target_arch = "wasm32")]
    {
        return u128::from(crate::api::time());
    }

    match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => d.as_nanos(),
        Err(_) => 0,
    }
}

/// Returns the current UNIX epoch time in seconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_secs() -> u64 {
    (time_nanos() / 1_000_000_000) as u64
}

/// Returns the current UNIX epoch time in nanoseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_nanos() -> u64 {
    time_nanos() as u64
}

/// Converts a duration to whole nanoseconds, saturating at `u64::MAX`.
#[must_use]
pub fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

///
/// TESTS
///
