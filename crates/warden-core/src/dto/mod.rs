pub mod auth;
pub mod certificate;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod monitoring;
pub mod provider;

///
/// PRELUDE
///

pub mod prelude {
    pub use crate::dto::provider::OpenIdProvider;
    pub use candid::{CandidType, Principal};
    pub use derive_more::Display;
    pub use serde::{Deserialize, Serialize};
    pub use serde_bytes::ByteBuf;
    pub use std::collections::BTreeMap;
}
