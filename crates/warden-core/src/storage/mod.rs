//! Persistent and heap-resident state.
//!
//! `stable` survives upgrades (configuration, certificates, monitoring
//! flags, salt, controllers, documents, the jti ledger). `heap` holds state
//! that is rebuilt after an upgrade (pending delegations, rate buckets,
//! fetch counters, scheduler state).

pub mod heap;
pub mod stable;

///
/// PRELUDE
///

pub mod prelude {
    pub use crate::dto::provider::OpenIdProvider;
    pub use candid::Principal;
    pub use serde::{Deserialize, Serialize};
}
