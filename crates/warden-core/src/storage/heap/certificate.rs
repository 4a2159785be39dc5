use crate::{domain::policy::scheduler::SchedulerState, storage::prelude::*};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static FETCH_COUNTERS: RefCell<BTreeMap<OpenIdProvider, FetchCounters>> =
        const { RefCell::new(BTreeMap::new()) };
    static SCHEDULERS: RefCell<BTreeMap<OpenIdProvider, SchedulerState>> =
        const { RefCell::new(BTreeMap::new()) };
    static NEXT_GENERATION: RefCell<u64> = const { RefCell::new(1) };
}

///
/// FetchCounters
/// Cooldown/backoff bookkeeping for one provider.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FetchCounters {
    pub last_attempt_at: Option<u64>,
    pub last_success_at: Option<u64>,
    pub consecutive_failures: u32,
}

///
/// FetchCounterStore
///

pub struct FetchCounterStore;

impl FetchCounterStore {
    #[must_use]
    pub(crate) fn get(provider: OpenIdProvider) -> FetchCounters {
        FETCH_COUNTERS.with_borrow(|map| map.get(&provider).copied().unwrap_or_default())
    }

    /// Stamp an attempt before the fetch suspends, so concurrent lookups
    /// fall into the cooldown window instead of fetching again.
    pub(crate) fn record_attempt(provider: OpenIdProvider, now: u64) {
        FETCH_COUNTERS.with_borrow_mut(|map| {
            map.entry(provider).or_default().last_attempt_at = Some(now);
        });
    }

    pub(crate) fn record_success(provider: OpenIdProvider, now: u64) {
        FETCH_COUNTERS.with_borrow_mut(|map| {
            let counters = map.entry(provider).or_default();
            counters.last_success_at = Some(now);
            counters.consecutive_failures = 0;
        });
    }

    pub(crate) fn record_failure(provider: OpenIdProvider) {
        FETCH_COUNTERS.with_borrow_mut(|map| {
            let counters = map.entry(provider).or_default();
            counters.consecutive_failures = counters.consecutive_failures.saturating_add(1);
        });
    }
}

///
/// SchedulerStore
///

pub struct SchedulerStore;

impl SchedulerStore {
    #[must_use]
    pub(crate) fn get(provider: OpenIdProvider) -> SchedulerState {
        SCHEDULERS.with_borrow(|map| map.get(&provider).copied().unwrap_or_default())
    }

    pub(crate) fn set(provider: OpenIdProvider, state: SchedulerState) {
        SCHEDULERS.with_borrow_mut(|map| {
            map.insert(provider, state);
        });
    }

    pub(crate) fn next_generation() -> u64 {
        NEXT_GENERATION.with_borrow_mut(|next| {
            let generation = *next;
            *next += 1;
            generation
        })
    }
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    FETCH_COUNTERS.with_borrow_mut(BTreeMap::clear);
    SCHEDULERS.with_borrow_mut(BTreeMap::clear);
}
