//! Validation rules for the runtime authentication config. Shared by the
//! bootstrap TOML and the versioned admin endpoint.

use super::{ConfigSchemaError, Validate};
use crate::{
    domain::{
        policy::delegation::{MAX_AUTOMATION_TTL, MAX_DELEGATION_TTL},
        provider::{ProviderKind, provider_spec},
    },
    dto::{
        config::{AutomationConfig, AutomationRepository, OpenIdConfig, RateConfig, SetAuthenticationConfig},
        controller::ControllerScope,
    },
};
use std::time::Duration;
use warden_cdk::utils::time::duration_nanos;

fn invalid(message: impl Into<String>) -> ConfigSchemaError {
    ConfigSchemaError::ValidationError(message.into())
}

fn validate_ttl(ttl: Option<u64>, max: Duration, context: &str) -> Result<(), ConfigSchemaError> {
    match ttl {
        Some(0) => Err(invalid(format!("{context} max_time_to_live must be positive"))),
        Some(ttl) if ttl > duration_nanos(max) => Err(invalid(format!(
            "{context} max_time_to_live exceeds {}s",
            max.as_secs()
        ))),
        _ => Ok(()),
    }
}

impl Validate for RateConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.max_tokens == 0 {
            return Err(invalid("rate max_tokens must be positive"));
        }
        if self.time_per_token_ns == 0 {
            return Err(invalid("rate time_per_token_ns must be positive"));
        }

        Ok(())
    }
}

impl Validate for OpenIdConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        for (provider, config) in &self.providers {
            if provider_spec(*provider).kind != ProviderKind::User {
                return Err(invalid(format!(
                    "{provider} cannot authenticate users"
                )));
            }
            if config.client_id.trim().is_empty() {
                return Err(invalid(format!("{provider} client_id is empty")));
            }
        }

        if let Some(delegation) = &self.delegation {
            validate_ttl(delegation.max_time_to_live, MAX_DELEGATION_TTL, "delegation")?;
        }

        self.rate.as_ref().map_or(Ok(()), Validate::validate)
    }
}

impl Validate for AutomationRepository {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.owner.trim().is_empty() || self.name.trim().is_empty() {
            return Err(invalid("repository owner and name are required"));
        }

        let context = format!("repository {}/{}", self.owner, self.name);
        if self.scope == Some(ControllerScope::Admin) {
            return Err(invalid(format!("{context} cannot grant the Admin scope")));
        }
        if let Some(refs) = &self.refs
            && refs.iter().any(|r| r.trim().is_empty())
        {
            return Err(invalid(format!("{context} has an empty ref")));
        }

        validate_ttl(self.max_time_to_live, MAX_AUTOMATION_TTL, &context)
    }
}

impl Validate for AutomationConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        for (provider, config) in &self.providers {
            if provider_spec(*provider).kind != ProviderKind::Automation {
                return Err(invalid(format!(
                    "{provider} cannot authenticate automation"
                )));
            }
            for repository in &config.repositories {
                repository.validate()?;
            }
        }

        self.rate.as_ref().map_or(Ok(()), Validate::validate)
    }
}

impl Validate for SetAuthenticationConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if let Some(openid) = &self.openid {
            openid.validate()?;
        }
        if let Some(automation) = &self.automation {
            automation.validate()?;
        }
        if let Some(rate) = &self.certificate_fetch_rate {
            rate.validate()?;
        }

        Ok(())
    }
}

///
/// TESTS
///
