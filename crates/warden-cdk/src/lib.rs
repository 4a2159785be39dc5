///
/// Façade over the Internet Computer SDK
///
/// Re-exports the IC crates the OpenID core depends on (`ic_cdk`, `candid`,
/// `ic_cdk_timers`, stable structures, canister signatures) under one
/// namespace so the core and the canisters built on it share a single import
/// surface and a single set of SDK versions.
///
pub use candid;
pub use ic_canister_sig_creation as canister_sig_creation;
pub use ic_cdk::{
    api, call, eprintln, export_candid, futures, init, post_upgrade, println, query, trap,
    update,
};
pub use ic_cdk_management_canister as mgmt;
pub use ic_cdk_timers as timers;
pub use ic_certified_map as certified_map;

pub mod structures;
pub mod utils;
