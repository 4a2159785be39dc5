//! Stable-memory plumbing shared by the Warden crates.
//!
//! Hosts the memory manager, the memory-id registry (with per-crate range
//! reservation), eager TLS helpers, the CBOR codec used for stored values,
//! and the macros that tie them together (`ic_memory!`, `eager_static!`,
//! `impl_storable_bounded!`, `impl_storable_unbounded!`).

pub mod macros;
pub mod manager;
pub mod registry;
pub mod runtime;
pub mod serialize;

pub use ::warden_cdk as cdk;

pub use manager::MEMORY_MANAGER;
pub use runtime::{MemoryRuntime, init_eager_tls};
pub use thiserror::Error as ThisError;

#[doc(hidden)]
pub mod __reexports {
    pub use ctor;
}
