//! Provider certificate cache and refresh scheduler.
//!
//! One component: the key-set cache, the fetch counters that drive cooldown
//! and backoff, and the per-provider scheduler state. Verification calls
//! [`CertificateOps::get_or_fetch`], or [`CertificateOps::get_cached`] from
//! query context; the monitoring workflow drives
//! the scheduler through the `*_monitoring` and `on_fire` functions.

pub mod fetch;

pub use fetch::{IcJwksFetcher, JwksFetcher};

use crate::{
    domain::{
        policy::{
            backoff::fetch_allowed_at,
            scheduler::{SchedulerError, SchedulerState},
        },
        provider::provider_spec,
    },
    dto::{
        certificate::{Jwk, OpenIdCertificate},
        error::{ErrorCode, GetOrFetchJwks},
        monitoring::ProviderMonitoringStatus,
    },
    ops::{
        prelude::*,
        rate::{RateLimitOps, RateOperation},
        storage::config::AuthConfigOps,
    },
    storage::{
        heap::certificate::{FetchCounterStore, SchedulerStore},
        stable::{
            certificate::{CertificateRecord, CertificateStore},
            monitoring::MonitoringStore,
        },
    },
};
use std::time::Duration;

///
/// CertificateOpsError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CertificateOpsError {
    #[error("certificate fetch rate limit reached")]
    RateLimited,

    #[error("certificate fetch failed: {0}")]
    FetchFailed(String),
}

impl From<CertificateOpsError> for InternalError {
    fn from(err: CertificateOpsError) -> Self {
        let code = match err {
            CertificateOpsError::RateLimited => ErrorCode::ResourceExhausted,
            CertificateOpsError::FetchFailed(_) => ErrorCode::Internal,
        };

        Self::ops(InternalErrorOrigin::Ops, err.to_string()).with_code(code)
    }
}

///
/// CertificateOps
///

pub struct CertificateOps;

impl CertificateOps {
    // -------------------------------------------------------------------------
    // Cache
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn certificate(provider: OpenIdProvider) -> Option<OpenIdCertificate> {
        CertificateStore::get(provider).map(|record| OpenIdCertificate {
            jwks: record.jwks,
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
            expires_at: record.expires_at,
        })
    }

    /// Resolve the signing key `kid` of `provider`.
    ///
    /// A missing certificate is reported as is: the first key set arrives
    /// through monitoring, never from a verification. A missing key triggers
    /// at most one fetch, subject to the cooldown window and the global
    /// fetch budget.
    pub async fn get_or_fetch(
        provider: OpenIdProvider,
        kid: &str,
        fetcher: &dyn JwksFetcher,
        now: u64,
    ) -> Result<Jwk, GetOrFetchJwks> {
        let Some(record) = CertificateStore::get(provider) else {
            return Err(GetOrFetchJwks::CertificateNotFound);
        };

        if let Some(jwk) = record.jwks.find(kid) {
            return Ok(jwk.clone());
        }

        let counters = FetchCounterStore::get(provider);
        if let Some(last_attempt_at) = counters.last_attempt_at
            && now < fetch_allowed_at(last_attempt_at, counters.consecutive_failures)
        {
            return Err(GetOrFetchJwks::KeyNotFoundCooldown);
        }

        match Self::fetch_and_store(provider, fetcher, now).await {
            Ok(record) => record
                .jwks
                .find(kid)
                .cloned()
                .ok_or(GetOrFetchJwks::KeyNotFound),
            Err(CertificateOpsError::RateLimited) => Err(GetOrFetchJwks::FetchRateLimited),
            Err(CertificateOpsError::FetchFailed(message)) => {
                Err(GetOrFetchJwks::FetchFailed(message))
            }
        }
    }

    /// Key lookup against the cached key set only. Query calls cannot
    /// fetch, so a miss is final here.
    pub fn get_cached(provider: OpenIdProvider, kid: &str) -> Result<Jwk, GetOrFetchJwks> {
        let record = CertificateStore::get(provider).ok_or(GetOrFetchJwks::CertificateNotFound)?;

        record.jwks.find(kid).cloned().ok_or(GetOrFetchJwks::KeyNotFound)
    }

    /// Rate-limited fetch that replaces the cached key set on success. A
    /// fetch refused by the budget counts as a failed attempt.
    pub async fn fetch_and_store(
        provider: OpenIdProvider,
        fetcher: &dyn JwksFetcher,
        now: u64,
    ) -> Result<CertificateRecord, CertificateOpsError> {
        let rate = AuthConfigOps::certificate_fetch_rate();
        if !RateLimitOps::try_consume(RateOperation::CertificateFetch, None, Some(&rate), now, 1) {
            FetchCounterStore::record_failure(provider);

            return Err(CertificateOpsError::RateLimited);
        }

        FetchCounterStore::record_attempt(provider, now);

        let url = provider_spec(provider).jwks_url;
        let jwks = match fetcher.fetch(provider, url).await.and_then(|body| fetch::parse_jwks(&body)) {
            Ok(jwks) => jwks,
            Err(message) => {
                FetchCounterStore::record_failure(provider);
                log!(Topic::Certificate, Warn, "{provider} certificate fetch failed: {message}");

                return Err(CertificateOpsError::FetchFailed(message));
            }
        };

        let record = match CertificateStore::get(provider) {
            Some(current) => CertificateRecord {
                jwks,
                version: current.version + 1,
                created_at: current.created_at,
                updated_at: now,
                expires_at: None,
            },
            None => CertificateRecord {
                jwks,
                version: 1,
                created_at: now,
                updated_at: now,
                expires_at: None,
            },
        };

        CertificateStore::insert(provider, record.clone());
        FetchCounterStore::record_success(provider, now);
        log!(
            Topic::Certificate,
            Ok,
            "{provider} certificate updated to version {} ({} keys)",
            record.version,
            record.jwks.keys.len()
        );

        Ok(record)
    }

    // -------------------------------------------------------------------------
    // Scheduler
    // -------------------------------------------------------------------------

    /// Start monitoring; returns the generation the first fire must carry.
    pub fn start_monitoring(provider: OpenIdProvider, now: u64) -> Result<u64, SchedulerError> {
        let generation = SchedulerStore::next_generation();
        let state = SchedulerStore::get(provider).start(now, generation)?;

        SchedulerStore::set(provider, state);
        MonitoringStore::set_running(provider, true, now);
        log!(Topic::Monitoring, Info, "{provider} monitoring started");

        Ok(generation)
    }

    pub fn stop_monitoring(provider: OpenIdProvider, now: u64) -> Result<(), SchedulerError> {
        let state = SchedulerStore::get(provider).stop()?;

        SchedulerStore::set(provider, state);
        MonitoringStore::set_running(provider, false, now);
        log!(Topic::Monitoring, Info, "{provider} monitoring stopped");

        Ok(())
    }

    /// Rebuild scheduler state from the persisted running flags after an
    /// upgrade. Every provider returned is due immediately.
    #[must_use]
    pub fn restore_monitoring(now: u64) -> Vec<(OpenIdProvider, u64)> {
        MonitoringStore::running_providers()
            .into_iter()
            .filter_map(|provider| {
                let generation = SchedulerStore::next_generation();
                let state = SchedulerState::Stopped.start(now, generation).ok()?;
                SchedulerStore::set(provider, state);
                log!(Topic::Monitoring, Info, "{provider} monitoring restored");

                Some((provider, generation))
            })
            .collect()
    }

    /// Whether a fire armed under `generation` is still the live one.
    #[must_use]
    pub fn is_current(provider: OpenIdProvider, generation: u64) -> bool {
        SchedulerStore::get(provider).generation() == Some(generation)
    }

    /// Re-arm after a fire and return the delay until the next one, or
    /// `None` when monitoring was stopped or restarted in the meantime.
    /// The delay follows the fetch counters, so an on-demand fetch between
    /// fires moves the scheduler in and out of backoff too.
    #[must_use]
    pub fn on_fire(provider: OpenIdProvider, generation: u64, now: u64) -> Option<Duration> {
        if !Self::is_current(provider, generation) {
            return None;
        }

        let failures = FetchCounterStore::get(provider).consecutive_failures;
        let next = SchedulerStore::get(provider).rearm(now, failures);
        SchedulerStore::set(provider, next);

        let delay = next.delay_from(now)?;
        log!(
            Topic::Monitoring,
            Debug,
            "{provider} next certificate fetch in {}s (backoff level {failures})",
            delay.as_secs()
        );

        Some(delay)
    }

    #[must_use]
    pub fn status(provider: OpenIdProvider) -> ProviderMonitoringStatus {
        let state = SchedulerStore::get(provider);
        let counters = FetchCounterStore::get(provider);

        ProviderMonitoringStatus {
            provider,
            running: state.is_running(),
            backoff_level: if state.is_running() {
                counters.consecutive_failures
            } else {
                0
            },
            next_fire: state.next_fire(),
            last_fetch_at: counters.last_attempt_at,
            consecutive_failures: counters.consecutive_failures,
            certificate_version: CertificateStore::get(provider).map(|record| record.version),
        }
    }
}

///
/// TESTS
///
