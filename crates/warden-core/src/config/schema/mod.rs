mod auth;

pub use auth::*;

use crate::dto::{
    config::{
        AutomationConfig, AutomationProviderConfig, AutomationRepository, DelegationConfig,
        OpenIdConfig, OpenIdProviderConfig, RateConfig, SetAuthenticationConfig,
    },
    controller::ControllerScope,
    provider::OpenIdProvider,
};
use candid::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

const NANOS_PER_SEC: u64 = 1_000_000_000;

///
/// ConfigSchemaError
///

#[derive(Debug, ThisError)]
pub enum ConfigSchemaError {
    #[error("validation error: {0}")]
    ValidationError(String),
}

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigSchemaError>;
}

///
/// ConfigModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigModel {
    #[serde(default)]
    pub openid: Option<OpenIdModel>,

    #[serde(default)]
    pub automation: Option<AutomationModel>,

    #[serde(default)]
    pub certificate_fetch_rate: Option<RateModel>,
}

impl ConfigModel {
    /// Runtime configuration this bootstrap document describes.
    pub fn to_auth_config(&self) -> Result<SetAuthenticationConfig, ConfigSchemaError> {
        Ok(SetAuthenticationConfig {
            openid: self.openid.as_ref().map(OpenIdModel::to_config).transpose()?,
            automation: self.automation.as_ref().map(AutomationModel::to_config),
            certificate_fetch_rate: self.certificate_fetch_rate.map(RateModel::to_config),
            version: None,
        })
    }
}

impl Validate for ConfigModel {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        self.to_auth_config()?.validate()
    }
}

///
/// RateModel
///

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateModel {
    pub max_tokens: u64,
    pub time_per_token_secs: u64,
}

impl RateModel {
    const fn to_config(self) -> RateConfig {
        RateConfig {
            max_tokens: self.max_tokens,
            time_per_token_ns: self.time_per_token_secs.saturating_mul(NANOS_PER_SEC),
        }
    }
}

///
/// ClientModel
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientModel {
    pub client_id: String,
}

///
/// DelegationModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DelegationModel {
    #[serde(default)]
    pub targets: Option<Vec<String>>,

    #[serde(default)]
    pub max_time_to_live_secs: Option<u64>,
}

///
/// OpenIdModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenIdModel {
    #[serde(default)]
    pub google: Option<ClientModel>,

    #[serde(default)]
    pub github_auth: Option<ClientModel>,

    #[serde(default)]
    pub delegation: Option<DelegationModel>,

    #[serde(default)]
    pub rate: Option<RateModel>,
}

impl OpenIdModel {
    fn to_config(&self) -> Result<OpenIdConfig, ConfigSchemaError> {
        let mut providers = BTreeMap::new();
        for (provider, client) in [
            (OpenIdProvider::Google, &self.google),
            (OpenIdProvider::GitHubAuth, &self.github_auth),
        ] {
            if let Some(client) = client {
                providers.insert(
                    provider,
                    OpenIdProviderConfig {
                        client_id: client.client_id.clone(),
                    },
                );
            }
        }

        let delegation = match &self.delegation {
            Some(model) => Some(DelegationConfig {
                targets: model
                    .targets
                    .as_ref()
                    .map(|targets| parse_principals(targets))
                    .transpose()?,
                max_time_to_live: model
                    .max_time_to_live_secs
                    .map(|secs| secs.saturating_mul(NANOS_PER_SEC)),
            }),
            None => None,
        };

        Ok(OpenIdConfig {
            providers,
            delegation,
            rate: self.rate.map(RateModel::to_config),
        })
    }
}

fn parse_principals(texts: &[String]) -> Result<Vec<Principal>, ConfigSchemaError> {
    texts
        .iter()
        .map(|text| {
            Principal::from_text(text).map_err(|e| {
                ConfigSchemaError::ValidationError(format!(
                    "delegation target '{text}' is not a principal: {e}"
                ))
            })
        })
        .collect()
}

///
/// RepositoryModel
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryModel {
    pub owner: String,
    pub name: String,

    #[serde(default)]
    pub refs: Option<Vec<String>>,

    #[serde(default)]
    pub scope: Option<ControllerScope>,

    #[serde(default)]
    pub max_time_to_live_secs: Option<u64>,
}

///
/// AutomationProviderModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationProviderModel {
    #[serde(default)]
    pub repositories: Vec<RepositoryModel>,
}

///
/// AutomationModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationModel {
    #[serde(default)]
    pub github_actions: Option<AutomationProviderModel>,

    #[serde(default)]
    pub rate: Option<RateModel>,
}

impl AutomationModel {
    fn to_config(&self) -> AutomationConfig {
        let mut providers = BTreeMap::new();
        if let Some(model) = &self.github_actions {
            let repositories = model
                .repositories
                .iter()
                .map(|repo| AutomationRepository {
                    owner: repo.owner.clone(),
                    name: repo.name.clone(),
                    refs: repo.refs.clone(),
                    scope: repo.scope,
                    max_time_to_live: repo
                        .max_time_to_live_secs
                        .map(|secs| secs.saturating_mul(NANOS_PER_SEC)),
                })
                .collect();

            providers.insert(
                OpenIdProvider::GitHubActions,
                AutomationProviderConfig { repositories },
            );
        }

        AutomationConfig {
            providers,
            rate: self.rate.map(RateModel::to_config),
        }
    }
}

///
/// TESTS
///
