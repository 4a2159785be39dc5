//! Canister lifecycle.
//!
//! `init` and `post_upgrade` stay synchronous: they bring stable memory up,
//! install the bootstrap config and hand anything async (salt generation,
//! certificate fetches) to zero-delay timers.

use crate::{
    WARDEN_MEMORY_MAX, WARDEN_MEMORY_MIN,
    cdk::api::trap,
    config::Config,
    log,
    log::Topic,
    memory::MemoryRuntime,
    ops::{
        ic::{
            IcOps,
            mgmt::MgmtOps,
            signature::SignatureOps,
            timer::{TimerId, TimerOps},
        },
        storage::salt::SaltOps,
    },
    workflow::{config, monitoring},
};
use std::{cell::RefCell, fmt, time::Duration};

const SALT_RETRY_DELAY: Duration = Duration::from_secs(5);

thread_local! {
    static SALT_TIMER: RefCell<Option<TimerId>> = const { RefCell::new(None) };
}

///
/// LifecyclePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecyclePhase {
    Init,
    PostUpgrade,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::PostUpgrade => f.write_str("post_upgrade"),
        }
    }
}

fn lifecycle_trap(phase: LifecyclePhase, err: impl fmt::Display) -> ! {
    trap(format!("{phase}: {err}"))
}

/// `init` hook. `config_str` is the bootstrap TOML embedded by the canister.
pub fn init(config_str: &str) {
    start(LifecyclePhase::Init, config_str);
}

/// `post_upgrade` hook. Stored config, certificates and salt survive the
/// upgrade; heap state (pending delegations, rate buckets, signatures) does
/// not.
pub fn post_upgrade(config_str: &str) {
    start(LifecyclePhase::PostUpgrade, config_str);

    SignatureOps::sync_certified_data();
    monitoring::restore();
}

fn start(phase: LifecyclePhase, config_str: &str) {
    match MemoryRuntime::init(Some(("warden-core", WARDEN_MEMORY_MIN, WARDEN_MEMORY_MAX))) {
        Ok(summary) => log!(
            Topic::Init,
            Info,
            "{phase}: stable memory ready ({} ids registered)",
            summary.entries.len()
        ),
        Err(err) => lifecycle_trap(phase, format!("memory init failed: {err}")),
    }

    if let Err(err) = Config::init_from_toml(config_str) {
        lifecycle_trap(phase, format!("config init failed: {err}"));
    }

    if let Err(err) = config::seed_from_bootstrap(IcOps::now()) {
        lifecycle_trap(phase, format!("config seed failed: {err}"));
    }

    schedule_salt();
}

/// Arm a one-shot timer that fills the salt from `raw_rand` if it is unset.
fn schedule_salt() {
    if SaltOps::get().is_none() {
        arm_salt_timer(Duration::ZERO);
    }
}

fn arm_salt_timer(delay: Duration) {
    TimerOps::set_guarded(&SALT_TIMER, delay, "lifecycle:salt", async {
        SALT_TIMER.with_borrow_mut(Option::take);
        init_salt().await;
    });
}

async fn init_salt() {
    if SaltOps::get().is_some() {
        return;
    }

    match MgmtOps::raw_rand().await {
        Ok(salt) => {
            SaltOps::init(salt);
        }
        Err(err) => {
            log!(Topic::Init, Error, "salt generation failed: {err}");
            arm_salt_timer(SALT_RETRY_DELAY);
        }
    }
}
