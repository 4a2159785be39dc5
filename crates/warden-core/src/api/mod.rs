//! Endpoint façade.
//!
//! Thin wrappers called by the canister's exported methods. They read the
//! call context from the IC, apply access guards and map internal errors to
//! the public DTO errors. No orchestration lives here.

pub mod auth;
pub mod config;
pub mod controller;
pub mod http;
pub mod lifecycle;
pub mod monitoring;

use crate::{
    access::{AccessError, auth::require_admin},
    ops::ic::IcOps,
    workflow::CallContext,
};

/// Admin guard evaluated against the current message.
fn require_admin_caller(ctx: &CallContext) -> Result<(), AccessError> {
    require_admin(ctx.caller, IcOps::is_controller(&ctx.caller), ctx.now)
}
