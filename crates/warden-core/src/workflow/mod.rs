//! Orchestration of the authentication flows, monitoring timers and
//! canister lifecycle.
//!
//! Flows take a [`CallContext`] and a [`JwksFetcher`](crate::ops::certificate::JwksFetcher)
//! so they run unchanged under test; only the entry points below `api`
//! build the context from the IC.

pub mod auth;
pub mod config;
pub mod lifecycle;
pub mod monitoring;

use crate::ops::ic::IcOps;
use candid::Principal;

///
/// CallContext
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallContext {
    pub caller: Principal,
    pub canister_id: Principal,
    pub now: u64,
}

impl CallContext {
    /// Context of the message being executed.
    #[must_use]
    pub fn current() -> Self {
        Self {
            caller: IcOps::msg_caller(),
            canister_id: IcOps::canister_self(),
            now: IcOps::now(),
        }
    }
}
