//! Thin wrappers over IC system APIs. Only `api` and `workflow` call these;
//! ops below them receive the values as arguments.

pub mod http;
pub mod mgmt;
pub mod signature;
pub mod timer;

use crate::cdk::{
    api::{canister_self, is_controller, msg_caller},
    utils::time::now_nanos,
};
use candid::Principal;

///
/// IcOps
///

pub struct IcOps;

impl IcOps {
    #[must_use]
    pub fn canister_self() -> Principal {
        canister_self()
    }

    #[must_use]
    pub fn msg_caller() -> Principal {
        msg_caller()
    }

    #[must_use]
    pub fn is_controller(principal: &Principal) -> bool {
        is_controller(principal)
    }

    #[must_use]
    pub fn now() -> u64 {
        now_nanos()
    }
}
