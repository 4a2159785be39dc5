use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, memory::VirtualMemory},
    dto::certificate::Jwks,
    eager_static, ic_memory,
    memory::impl_storable_unbounded,
    storage::{prelude::*, stable::memory::certificate::CERTIFICATES_ID},
};
use std::cell::RefCell;

eager_static! {
    static CERTIFICATES: RefCell<
        BTreeMap<OpenIdProvider, CertificateRecord, VirtualMemory<DefaultMemoryImpl>>
    > = RefCell::new(
        BTreeMap::init(ic_memory!(CertificateStore, CERTIFICATES_ID)),
    );
}

///
/// CertificateRecord
/// Cached key set of one provider. `version` counts successful refreshes.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CertificateRecord {
    pub jwks: Jwks,
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
    pub expires_at: Option<u64>,
}

impl_storable_unbounded!(CertificateRecord);

///
/// CertificateStore
///

pub struct CertificateStore;

impl CertificateStore {
    #[must_use]
    pub(crate) fn get(provider: OpenIdProvider) -> Option<CertificateRecord> {
        CERTIFICATES.with_borrow(|map| map.get(&provider))
    }

    pub(crate) fn insert(provider: OpenIdProvider, record: CertificateRecord) {
        CERTIFICATES.with_borrow_mut(|map| {
            map.insert(provider, record);
        });
    }
}

#[cfg(test)]
impl CertificateStore {
    pub(crate) fn reset_for_tests() {
        CERTIFICATES.with_borrow_mut(BTreeMap::clear_new);
    }
}
