//! Pure decision rules. Nothing in here reads the clock, touches storage,
//! or calls the IC; callers pass `now` and state in and act on the result.

pub mod policy;
pub mod provider;
