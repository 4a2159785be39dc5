use crate::{ops::prelude::*, storage::stable::salt::SaltStore};

///
/// SaltOps
///

pub struct SaltOps;

impl SaltOps {
    #[must_use]
    pub fn get() -> Option<[u8; 32]> {
        SaltStore::get()
    }

    /// Store the canister salt unless one exists. Returns whether it did.
    pub fn init(salt: [u8; 32]) -> bool {
        if SaltStore::get().is_some() {
            return false;
        }

        SaltStore::set(salt);
        log!(Topic::Init, Ok, "canister salt initialized");

        true
    }
}

///
/// TESTS
///
