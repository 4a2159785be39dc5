use crate::{domain::policy::rate::TokenBucket, storage::prelude::*};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static BUCKETS: RefCell<BTreeMap<RateBucketKey, TokenBucket>> =
        const { RefCell::new(BTreeMap::new()) };
}

///
/// RateOperation
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum RateOperation {
    AuthenticateAutomation,
    AuthenticateUser,
    CertificateFetch,
}

///
/// RateBucketKey
/// Operation tag plus the caller for per-caller buckets.
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RateBucketKey {
    pub operation: RateOperation,
    pub caller: Option<Principal>,
}

///
/// RateBucketStore
///

pub struct RateBucketStore;

impl RateBucketStore {
    /// Run `f` against the bucket for `key`, creating it with `init` first.
    pub(crate) fn with_bucket<R>(
        key: RateBucketKey,
        init: impl FnOnce() -> TokenBucket,
        f: impl FnOnce(&mut TokenBucket) -> R,
    ) -> R {
        BUCKETS.with_borrow_mut(|map| f(map.entry(key).or_insert_with(init)))
    }

    /// Keep only the buckets `keep` accepts; returns how many were dropped.
    pub(crate) fn retain(mut keep: impl FnMut(&RateBucketKey, &TokenBucket) -> bool) -> usize {
        BUCKETS.with_borrow_mut(|map| {
            let before = map.len();
            map.retain(|key, bucket| keep(key, bucket));
            before - map.len()
        })
    }

    #[must_use]
    pub(crate) fn get(key: &RateBucketKey) -> Option<TokenBucket> {
        BUCKETS.with_borrow(|map| map.get(key).copied())
    }
}

#[cfg(test)]
impl RateBucketStore {
    pub(crate) fn reset_for_tests() {
        BUCKETS.with_borrow_mut(BTreeMap::clear);
    }
}
