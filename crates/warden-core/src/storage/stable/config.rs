use crate::{
    cdk::structures::{DefaultMemoryImpl, cell::Cell, memory::VirtualMemory},
    dto::config::AuthenticationConfig,
    eager_static, ic_memory,
    memory::impl_storable_unbounded,
    storage::{prelude::*, stable::memory::config::CONFIG_ID},
};
use std::cell::RefCell;

eager_static! {
    static AUTH_CONFIG: RefCell<Cell<AuthConfigRecord, VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(Cell::init(
            ic_memory!(AuthConfigStore, CONFIG_ID),
            AuthConfigRecord::default(),
        ));
}

///
/// AuthConfigRecord
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AuthConfigRecord {
    pub config: Option<AuthenticationConfig>,
}

impl_storable_unbounded!(AuthConfigRecord);

///
/// AuthConfigStore
///

pub struct AuthConfigStore;

impl AuthConfigStore {
    #[must_use]
    pub(crate) fn get() -> Option<AuthenticationConfig> {
        AUTH_CONFIG.with_borrow(|cell| cell.get().config.clone())
    }

    pub(crate) fn set(config: AuthenticationConfig) {
        AUTH_CONFIG.with_borrow_mut(|cell| {
            cell.set(AuthConfigRecord {
                config: Some(config),
            });
        });
    }
}

#[cfg(test)]
impl AuthConfigStore {
    pub(crate) fn reset_for_tests() {
        AUTH_CONFIG.with_borrow_mut(|cell| {
            cell.set(AuthConfigRecord::default());
        });
    }
}
