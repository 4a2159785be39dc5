use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, memory::VirtualMemory},
    eager_static, ic_memory,
    memory::impl_storable_bounded,
    storage::{prelude::*, stable::memory::certificate::MONITORING_ID},
};
use std::cell::RefCell;

eager_static! {
    static MONITORING: RefCell<
        BTreeMap<OpenIdProvider, MonitoringRecord, VirtualMemory<DefaultMemoryImpl>>
    > = RefCell::new(
        BTreeMap::init(ic_memory!(MonitoringStore, MONITORING_ID)),
    );
}

///
/// MonitoringRecord
/// Whether certificate monitoring was running; replayed after an upgrade.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MonitoringRecord {
    pub running: bool,
    pub updated_at: u64,
}

impl_storable_bounded!(MonitoringRecord, 32, false);

///
/// MonitoringStore
///

pub struct MonitoringStore;

impl MonitoringStore {
    #[must_use]
    pub(crate) fn is_running(provider: OpenIdProvider) -> bool {
        MONITORING.with_borrow(|map| map.get(&provider).is_some_and(|r| r.running))
    }

    pub(crate) fn set_running(provider: OpenIdProvider, running: bool, now: u64) {
        MONITORING.with_borrow_mut(|map| {
            map.insert(
                provider,
                MonitoringRecord {
                    running,
                    updated_at: now,
                },
            );
        });
    }

    #[must_use]
    pub(crate) fn running_providers() -> Vec<OpenIdProvider> {
        MONITORING.with_borrow(|map| {
            map.iter()
                .filter(|entry| entry.value().running)
                .map(|entry| *entry.key())
                .collect()
        })
    }
}

#[cfg(test)]
impl MonitoringStore {
    pub(crate) fn reset_for_tests() {
        MONITORING.with_borrow_mut(BTreeMap::clear_new);
    }
}
