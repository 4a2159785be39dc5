use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, memory::VirtualMemory},
    dto::controller::{ControllerKind, ControllerScope},
    eager_static, ic_memory,
    memory::impl_storable_unbounded,
    storage::{prelude::*, stable::memory::auth::CONTROLLERS_ID},
};
use std::{cell::RefCell, collections::BTreeMap as StdBTreeMap};

eager_static! {
    static CONTROLLERS: RefCell<
        BTreeMap<Principal, ControllerRecord, VirtualMemory<DefaultMemoryImpl>>
    > = RefCell::new(
        BTreeMap::init(ic_memory!(ControllerStore, CONTROLLERS_ID)),
    );
}

///
/// ControllerRecord
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ControllerRecord {
    pub scope: ControllerScope,
    pub kind: ControllerKind,
    pub metadata: StdBTreeMap<String, String>,
    pub created_at: u64,
    pub updated_at: u64,
    pub expires_at: Option<u64>,
}

impl ControllerRecord {
    #[must_use]
    pub fn is_active(&self, now: u64) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

impl_storable_unbounded!(ControllerRecord);

///
/// ControllerStore
///

pub struct ControllerStore;

impl ControllerStore {
    #[must_use]
    pub(crate) fn get(principal: &Principal) -> Option<ControllerRecord> {
        CONTROLLERS.with_borrow(|map| map.get(principal))
    }

    pub(crate) fn insert(principal: Principal, record: ControllerRecord) {
        CONTROLLERS.with_borrow_mut(|map| {
            map.insert(principal, record);
        });
    }

    pub(crate) fn remove(principal: &Principal) -> Option<ControllerRecord> {
        CONTROLLERS.with_borrow_mut(|map| map.remove(principal))
    }

    #[must_use]
    pub(crate) fn export() -> Vec<(Principal, ControllerRecord)> {
        CONTROLLERS.with_borrow(|map| {
            map.iter()
                .map(|entry| (*entry.key(), entry.value()))
                .collect()
        })
    }

    #[must_use]
    pub(crate) fn collect_expired(now: u64) -> Vec<Principal> {
        CONTROLLERS.with_borrow(|map| {
            map.iter()
                .filter(|entry| !entry.value().is_active(now))
                .map(|entry| *entry.key())
                .collect()
        })
    }
}

#[cfg(test)]
impl ControllerStore {
    pub(crate) fn reset_for_tests() {
        CONTROLLERS.with_borrow_mut(BTreeMap::clear_new);
    }
}
