//! Stateful operations between the workflows and the state layer.
//!
//! Ops take `now`, the caller and the canister id as arguments instead of
//! reading them from the IC, so every operation runs unchanged in unit tests.

pub mod certificate;
pub mod delegation;
pub mod ic;
pub mod jwt;
pub mod rate;
pub mod storage;

/// Common imports for ops submodules.
pub mod prelude {
    pub use crate::{
        error::{InternalError, InternalErrorOrigin},
        dto::provider::OpenIdProvider,
        log,
        log::Topic,
    };
    pub use candid::Principal;
    pub use serde::{Deserialize, Serialize};
    pub use thiserror::Error as ThisError;
}
