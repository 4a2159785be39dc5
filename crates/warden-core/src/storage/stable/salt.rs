use crate::{
    cdk::structures::{DefaultMemoryImpl, cell::Cell, memory::VirtualMemory},
    eager_static, ic_memory,
    memory::impl_storable_bounded,
    storage::{prelude::*, stable::memory::auth::SALT_ID},
};
use std::cell::RefCell;

eager_static! {
    static SALT: RefCell<Cell<SaltRecord, VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(Cell::init(ic_memory!(SaltStore, SALT_ID), SaltRecord::default()));
}

///
/// SaltRecord
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SaltRecord {
    pub salt: Option<[u8; 32]>,
}

impl_storable_bounded!(SaltRecord, 128, false);

///
/// SaltStore
/// Canister-wide salt for user key derivation. Written once.
///

pub struct SaltStore;

impl SaltStore {
    #[must_use]
    pub(crate) fn get() -> Option<[u8; 32]> {
        SALT.with_borrow(|cell| cell.get().salt)
    }

    pub(crate) fn set(salt: [u8; 32]) {
        SALT.with_borrow_mut(|cell| {
            cell.set(SaltRecord { salt: Some(salt) });
        });
    }
}

#[cfg(test)]
impl SaltStore {
    pub(crate) fn reset_for_tests() {
        SALT.with_borrow_mut(|cell| {
            cell.set(SaltRecord::default());
        });
    }
}
