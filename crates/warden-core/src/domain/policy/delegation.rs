//! Lifetimes and audiences of issued credentials.

use candid::Principal;
use std::time::Duration;
use warden_cdk::utils::time::duration_nanos;

/// Delegation lifetime when the caller does not request one.
pub const DEFAULT_DELEGATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Absolute ceiling on any delegation lifetime.
pub const MAX_DELEGATION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Absolute ceiling on automation controller lifetimes.
pub const MAX_AUTOMATION_TTL: Duration = Duration::from_secs(60 * 60);

/// `now + min(requested or default, configured max, hard max)`.
#[must_use]
pub fn delegation_expiration(now: u64, requested: Option<u64>, configured_max: Option<u64>) -> u64 {
    let hard_max = duration_nanos(MAX_DELEGATION_TTL);
    let ttl = requested
        .unwrap_or_else(|| duration_nanos(DEFAULT_DELEGATION_TTL))
        .min(configured_max.unwrap_or(hard_max))
        .min(hard_max);

    now.saturating_add(ttl)
}

/// Targets signed into a delegation.
///
/// Unset config yields no targets field, an empty list restricts the
/// delegation to this canister, and a non-empty list is used as-is.
#[must_use]
pub fn delegation_targets(
    configured: Option<&[Principal]>,
    canister_self: Principal,
) -> Option<Vec<Principal>> {
    match configured {
        None => None,
        Some([]) => Some(vec![canister_self]),
        Some(targets) => Some(targets.to_vec()),
    }
}

/// Expiry of an automation-granted controller.
#[must_use]
pub fn controller_expiration(now: u64, configured_ttl: Option<u64>) -> u64 {
    let cap = duration_nanos(MAX_AUTOMATION_TTL);

    now.saturating_add(configured_ttl.unwrap_or(cap).min(cap))
}

///
/// TESTS
///
