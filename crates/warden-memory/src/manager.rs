use crate::cdk::structures::{DefaultMemoryImpl, memory::MemoryManager};
use std::cell::RefCell;

// -----------------------------------------------------------------------------
// MEMORY_MANAGER
// -----------------------------------------------------------------------------
// One memory manager per canister; every stable structure takes its virtual
// memory from here by id.
// -----------------------------------------------------------------------------

thread_local! {
    pub static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(DefaultMemoryImpl::default()));
}
