use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, memory::VirtualMemory},
    eager_static, ic_memory,
    memory::impl_storable_unbounded,
    storage::{prelude::*, stable::memory::datastore::DOCUMENTS_ID},
};
use std::cell::RefCell;

eager_static! {
    static DOCUMENTS: RefCell<
        BTreeMap<DocumentKey, DocumentRecord, VirtualMemory<DefaultMemoryImpl>>
    > = RefCell::new(
        BTreeMap::init(ic_memory!(DocumentStore, DOCUMENTS_ID)),
    );
}

///
/// DocumentKey
///

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DocumentKey {
    pub collection: String,
    pub key: String,
}

impl DocumentKey {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl_storable_unbounded!(DocumentKey);

///
/// DocumentRecord
/// `data` is the CBOR encoding of the collection's payload type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub owner: Principal,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl_storable_unbounded!(DocumentRecord);

///
/// DocumentStore
///

pub struct DocumentStore;

impl DocumentStore {
    #[must_use]
    pub(crate) fn get(key: &DocumentKey) -> Option<DocumentRecord> {
        DOCUMENTS.with_borrow(|map| map.get(key))
    }

    pub(crate) fn insert(key: DocumentKey, record: DocumentRecord) {
        DOCUMENTS.with_borrow_mut(|map| {
            map.insert(key, record);
        });
    }
}

#[cfg(test)]
impl DocumentStore {
    pub(crate) fn reset_for_tests() {
        DOCUMENTS.with_borrow_mut(BTreeMap::clear_new);
    }
}
