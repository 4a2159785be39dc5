//! Certificate monitoring timers.
//!
//! One one-shot timer per running provider. Each fire fetches the key set
//! and re-arms itself with the delay the scheduler returns; a fire whose
//! generation is no longer current does nothing, so stop and restart never
//! race with an in-flight fetch.

use crate::{
    dto::{
        error::MonitoringError,
        monitoring::MonitoringStatus,
        provider::OpenIdProvider,
    },
    domain::policy::scheduler::SchedulerError,
    log,
    log::Topic,
    ops::{
        certificate::{CertificateOps, IcJwksFetcher, JwksFetcher},
        ic::{
            IcOps,
            timer::{TimerId, TimerOps},
        },
    },
};
use std::{cell::RefCell, collections::BTreeMap, time::Duration};

thread_local! {
    static MONITOR_TIMERS: RefCell<BTreeMap<OpenIdProvider, TimerId>> =
        const { RefCell::new(BTreeMap::new()) };
}

const fn monitoring_error(provider: OpenIdProvider, err: SchedulerError) -> MonitoringError {
    match err {
        SchedulerError::AlreadyRunning => MonitoringError::AlreadyRunning(provider),
        SchedulerError::NotRunning => MonitoringError::NotRunning(provider),
    }
}

pub fn start(provider: OpenIdProvider) -> Result<(), MonitoringError> {
    start_with(provider, &IcJwksFetcher)
}

fn start_with(
    provider: OpenIdProvider,
    fetcher: &'static dyn JwksFetcher,
) -> Result<(), MonitoringError> {
    let generation = CertificateOps::start_monitoring(provider, IcOps::now())
        .map_err(|err| monitoring_error(provider, err))?;

    schedule(provider, generation, Duration::ZERO, fetcher);

    Ok(())
}

pub fn stop(provider: OpenIdProvider) -> Result<(), MonitoringError> {
    CertificateOps::stop_monitoring(provider, IcOps::now())
        .map_err(|err| monitoring_error(provider, err))?;

    if let Some(id) = MONITOR_TIMERS.with_borrow_mut(|timers| timers.remove(&provider)) {
        TimerOps::clear(id);
    }

    Ok(())
}

/// Resume monitoring for providers that were running before an upgrade.
pub fn restore() {
    restore_with(&IcJwksFetcher);
}

fn restore_with(fetcher: &'static dyn JwksFetcher) {
    for (provider, generation) in CertificateOps::restore_monitoring(IcOps::now()) {
        schedule(provider, generation, Duration::ZERO, fetcher);
    }
}

#[must_use]
pub fn status() -> MonitoringStatus {
    MonitoringStatus {
        providers: OpenIdProvider::ALL
            .into_iter()
            .map(CertificateOps::status)
            .collect(),
    }
}

fn schedule(
    provider: OpenIdProvider,
    generation: u64,
    delay: Duration,
    fetcher: &'static dyn JwksFetcher,
) {
    let id = TimerOps::set(
        delay,
        format!("monitoring:{provider}"),
        fire(provider, generation, fetcher),
    );

    if let Some(previous) = MONITOR_TIMERS.with_borrow_mut(|timers| timers.insert(provider, id)) {
        TimerOps::clear(previous);
    }
}

async fn fire(provider: OpenIdProvider, generation: u64, fetcher: &'static dyn JwksFetcher) {
    if !CertificateOps::is_current(provider, generation) {
        return;
    }
    MONITOR_TIMERS.with_borrow_mut(|timers| timers.remove(&provider));

    if let Err(err) = CertificateOps::fetch_and_store(provider, fetcher, IcOps::now()).await {
        log!(Topic::Monitoring, Warn, "{provider} scheduled fetch failed: {err}");
    }

    match CertificateOps::on_fire(provider, generation, IcOps::now()) {
        Some(delay) => schedule(provider, generation, delay, fetcher),
        None => log!(
            Topic::Monitoring,
            Debug,
            "{provider} fire from generation {generation} dropped"
        ),
    }
}

///
/// TESTS
///
