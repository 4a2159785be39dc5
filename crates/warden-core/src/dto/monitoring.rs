use crate::dto::prelude::*;

///
/// ProviderMonitoringStatus
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProviderMonitoringStatus {
    pub provider: OpenIdProvider,
    pub running: bool,
    pub backoff_level: u32,
    pub next_fire: Option<u64>,
    pub last_fetch_at: Option<u64>,
    pub consecutive_failures: u32,
    pub certificate_version: Option<u64>,
}

///
/// MonitoringStatus
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MonitoringStatus {
    pub providers: Vec<ProviderMonitoringStatus>,
}
