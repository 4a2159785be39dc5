use crate::dto::{controller::ControllerScope, prelude::*};

///
/// RateConfig
/// Token bucket parameters: capacity and refill period of one token.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateConfig {
    pub max_tokens: u64,
    pub time_per_token_ns: u64,
}

///
/// OpenIdProviderConfig
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenIdProviderConfig {
    pub client_id: String,
}

///
/// DelegationConfig
///
/// `targets`: `None` signs delegations without a targets field, `Some([])`
/// restricts them to this canister, anything else to exactly that list.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DelegationConfig {
    pub targets: Option<Vec<Principal>>,
    pub max_time_to_live: Option<u64>,
}

///
/// OpenIdConfig
/// End-user authentication settings.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenIdConfig {
    pub providers: BTreeMap<OpenIdProvider, OpenIdProviderConfig>,
    pub delegation: Option<DelegationConfig>,
    pub rate: Option<RateConfig>,
}

///
/// AutomationRepository
/// One allow-listed repository; `refs: None` accepts every ref.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationRepository {
    pub owner: String,
    pub name: String,
    pub refs: Option<Vec<String>>,
    pub scope: Option<ControllerScope>,
    pub max_time_to_live: Option<u64>,
}

///
/// AutomationProviderConfig
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationProviderConfig {
    pub repositories: Vec<AutomationRepository>,
}

///
/// AutomationConfig
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationConfig {
    pub providers: BTreeMap<OpenIdProvider, AutomationProviderConfig>,
    pub rate: Option<RateConfig>,
}

///
/// AuthenticationConfig
/// Stored runtime configuration.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuthenticationConfig {
    pub openid: Option<OpenIdConfig>,
    pub automation: Option<AutomationConfig>,
    pub certificate_fetch_rate: Option<RateConfig>,
    pub version: Option<u64>,
    pub created_at: Option<u64>,
    pub updated_at: Option<u64>,
}

///
/// SetAuthenticationConfig
/// `version` must echo the stored version when a config already exists.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SetAuthenticationConfig {
    pub openid: Option<OpenIdConfig>,
    pub automation: Option<AutomationConfig>,
    pub certificate_fetch_rate: Option<RateConfig>,
    pub version: Option<u64>,
}
