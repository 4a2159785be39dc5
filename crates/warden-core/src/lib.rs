//! OpenID Connect authentication core for Internet Computer canisters.
//!
//! Layering (outermost first):
//! - `api`: endpoint-facing functions returning public DTO errors
//! - `workflow`: orchestration of the authentication flows and timers
//! - `ops`: stateful operations (certificates, rate limits, JWT checks,
//!   delegations, storage access)
//! - `storage`: stable and heap-resident records
//! - `domain::policy`: pure decision rules (backoff, scheduling, buckets, TTLs)
//! - `infra`: raw IC calls (HTTP outcalls, canister signatures, randomness)

pub mod access;
pub mod api;
pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod infra;
pub mod log;
pub mod ops;
pub mod storage;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test;

pub use ::warden_cdk as cdk;
pub use ::warden_memory as memory;

pub(crate) use error::{InternalError, InternalErrorClass, InternalErrorOrigin};
pub(crate) use warden_memory::{eager_static, ic_memory};

pub use config::init_config;

/// Inclusive stable-memory id range owned by this crate.
pub const WARDEN_MEMORY_MIN: u8 = 1;
pub const WARDEN_MEMORY_MAX: u8 = 20;
