use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static PENDING_DELEGATIONS: RefCell<BTreeMap<PendingDelegationKey, PendingDelegation>> =
        const { RefCell::new(BTreeMap::new()) };
}

///
/// PendingDelegationKey
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct PendingDelegationKey {
    pub user_key: Vec<u8>,
    pub session_key: Vec<u8>,
    pub expiration: u64,
}

///
/// PendingDelegation
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingDelegation {
    pub created_at: u64,
}

///
/// PendingDelegationStore
/// Delegations prepared by `authenticate_user`, awaiting `get_delegation`.
///

pub struct PendingDelegationStore;

impl PendingDelegationStore {
    pub(crate) fn insert(key: PendingDelegationKey, pending: PendingDelegation) {
        PENDING_DELEGATIONS.with_borrow_mut(|map| {
            map.insert(key, pending);
        });
    }

    #[must_use]
    pub(crate) fn get(key: &PendingDelegationKey) -> Option<PendingDelegation> {
        PENDING_DELEGATIONS.with_borrow(|map| map.get(key).copied())
    }

    /// Drop every entry whose expiration is not after `now`.
    pub(crate) fn evict_expired(now: u64) -> usize {
        PENDING_DELEGATIONS.with_borrow_mut(|map| {
            let before = map.len();
            map.retain(|key, _| key.expiration > now);
            before - map.len()
        })
    }

    #[must_use]
    pub(crate) fn len() -> usize {
        PENDING_DELEGATIONS.with_borrow(BTreeMap::len)
    }
}

#[cfg(test)]
impl PendingDelegationStore {
    pub(crate) fn reset_for_tests() {
        PENDING_DELEGATIONS.with_borrow_mut(BTreeMap::clear);
    }
}
