use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, Storable, memory::VirtualMemory, storable::Bound},
    eager_static, ic_memory,
    memory::impl_storable_bounded,
    storage::{prelude::*, stable::memory::auth::UNIQUE_TOKENS_ID},
};
use std::{borrow::Cow, cell::RefCell};

eager_static! {
    static UNIQUE_TOKENS: RefCell<
        BTreeMap<TokenHash, UniqueTokenRecord, VirtualMemory<DefaultMemoryImpl>>
    > = RefCell::new(
        BTreeMap::init(ic_memory!(UniqueTokenStore, UNIQUE_TOKENS_ID)),
    );
}

///
/// TokenHash
/// SHA-256 of a token's `jti`.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TokenHash(pub [u8; 32]);

impl Storable for TokenHash {
    const BOUND: Bound = Bound::Bounded {
        max_size: 32,
        is_fixed_size: true,
    };

    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        let mut out = [0u8; 32];
        if bytes.len() == 32 {
            out.copy_from_slice(&bytes);
        }

        Self(out)
    }
}

///
/// UniqueTokenRecord
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UniqueTokenRecord {
    pub provider: OpenIdProvider,
    pub created_at: u64,
}

impl_storable_bounded!(UniqueTokenRecord, 64, false);

///
/// UniqueTokenStore
/// Append-only ledger of consumed automation tokens.
///

pub struct UniqueTokenStore;

impl UniqueTokenStore {
    #[must_use]
    pub(crate) fn contains(hash: &TokenHash) -> bool {
        UNIQUE_TOKENS.with_borrow(|map| map.contains_key(hash))
    }

    pub(crate) fn insert(hash: TokenHash, record: UniqueTokenRecord) {
        UNIQUE_TOKENS.with_borrow_mut(|map| {
            map.insert(hash, record);
        });
    }

    #[must_use]
    pub(crate) fn len() -> u64 {
        UNIQUE_TOKENS.with_borrow(BTreeMap::len)
    }
}

#[cfg(test)]
impl UniqueTokenStore {
    pub(crate) fn reset_for_tests() {
        UNIQUE_TOKENS.with_borrow_mut(BTreeMap::clear_new);
    }
}
